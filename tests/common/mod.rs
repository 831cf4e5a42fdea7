//! Common test utilities shared across test modules.
//!
//! This module provides helpers for setting up mock servers, minting tokens,
//! and building the JSON bodies the Hostup API returns.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hostup_dns::hostup::{Credentials, HostupProvider};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sets up a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Test constants used across multiple test modules.
pub mod constants {
    pub const USERNAME: &str = "user@example.com";
    pub const PASSWORD: &str = "secret";

    /// Year 5000 expiration.
    pub const FAR_FUTURE: i64 = 95_617_584_000;

    pub const SERVICE_ID: i64 = 1001;
    pub const ZONE_ID_1: i64 = 11;
    pub const ZONE_ID_2: i64 = 22;
}

use constants::*;

/// Mints an unsigned JWT carrying the given `exp` claim.
pub fn jwt_expiring_at(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({ "sub": USERNAME, "exp": exp }).to_string();
    let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}

/// A provider pointed at `server` with its token cache inside `dir`.
pub fn provider_for(server: &MockServer, dir: &TempDir) -> HostupProvider {
    HostupProvider::new(credentials_for(server, &cache_path(dir)))
        .expect("Failed to create provider")
}

pub fn credentials_for(server: &MockServer, cache: &Path) -> Credentials {
    Credentials::new(USERNAME, PASSWORD, server.uri(), cache)
}

pub fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join("token.json")
}

/// Writes a cache file holding `token`.
pub fn write_cached_token(dir: &TempDir, token: &str) {
    let body = json!({ "token": token, "refresh": "" }).to_string();
    std::fs::write(cache_path(dir), body).expect("Failed to write cache");
}

/// Mounts a `POST /login` that hands out a far-future token, expecting `times` calls.
pub async fn mount_login(server: &MockServer, times: u64) -> String {
    let token = jwt_expiring_at(FAR_FUTURE);
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_login_response(&token)))
        .expect(times)
        .mount(server)
        .await;
    token
}

pub fn mock_login_response(token: &str) -> Value {
    json!({ "token": token, "refresh": "refresh-token" })
}

/// `GET /dns` body for zones `(domain_id, name)` of [`SERVICE_ID`].
pub fn mock_zones_response(zones: &[(i64, &str)]) -> Value {
    json!({
        "service_ids": [SERVICE_ID],
        "zones": zones.iter().map(|(id, name)| json!({
            "service_id": SERVICE_ID,
            "domain_id": id,
            "name": name,
        })).collect::<Vec<_>>(),
    })
}

/// A TXT record as it appears in a zone listing.
pub fn mock_record(id: i64, domain_id: i64, name: &str, content: &str) -> Value {
    json!({
        "id": id,
        "domain_id": domain_id,
        "name": name,
        "type": "TXT",
        "content": content,
        "ttl": 300,
        "priority": 0,
        "change_date": 1_700_000_000,
    })
}

/// `GET /service/{sid}/dns/{zid}` body.
pub fn mock_zone_details(name: &str, records: Vec<Value>) -> Value {
    json!({
        "service_id": SERVICE_ID,
        "name": name,
        "records": records,
    })
}

/// Create/delete response body.
pub fn mock_record_response(name: &str, content: &str) -> Value {
    json!({
        "success": true,
        "record": {
            "name": name,
            "ttl": 300,
            "priority": 0,
            "type": "TXT",
            "content": content,
        },
        "info": [["dns_record_created", "ok"]],
    })
}

pub fn mock_error_response(errors: &[&str]) -> Value {
    json!({ "success": false, "error": errors })
}

pub fn zone_path(domain_id: i64) -> String {
    format!("/service/{}/dns/{}", SERVICE_ID, domain_id)
}
