//! Unit tests for public types and helpers.
//!
//! These tests focus on parsing logic and configuration that don't require
//! API responses beyond what a local mock server can serve.

mod http_config;
mod types;
