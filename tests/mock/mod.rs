//! Mock-based tests for the Hostup provider.
//!
//! These tests use wiremock to simulate API responses without hitting the real API.
