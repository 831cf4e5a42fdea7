//! Integration tests for the Hostup provider.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `HOSTUP_USERNAME` | Yes | Account username |
//! | `HOSTUP_PASSWORD` | Yes | Account password |
//! | `HOSTUP_API_ENDPOINT` | No | API root, defaults to the public API |
//!
//! The token is cached in a temporary directory, never in the user's cache.

use std::env;

use hostup_dns::config::{self, PartialSettings};
use hostup_dns::hostup::HostupProvider;
use tempfile::TempDir;

/// Loads credentials from the environment, with the cache under `dir`.
/// Returns None if credentials are not available.
fn get_test_provider(dir: &TempDir) -> Option<HostupProvider> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let overrides = PartialSettings {
        token_cache_path: Some(dir.path().join("token.json")),
        ..PartialSettings::default()
    };
    let credentials = config::resolve(None, overrides, |key| env::var(key).ok()).ok()?;
    HostupProvider::new(credentials).ok()
}

/// Test that we can log in, list zones and log out again.
#[tokio::test]
#[ignore = "requires HOSTUP credentials in .env"]
async fn test_login_list_zones_logout() {
    let dir = tempfile::tempdir().unwrap();
    let provider = get_test_provider(&dir)
        .expect("HOSTUP credentials not found. Set HOSTUP_USERNAME and HOSTUP_PASSWORD in .env");

    let zones = provider.list_zones().await.expect("Failed to list zones");
    println!("Found {} zones", zones.zones.len());
    for zone in &zones.zones {
        println!(
            "  - {} (service {}, zone {})",
            zone.name, zone.service_id, zone.domain_id
        );
    }
    assert!(dir.path().join("token.json").exists());

    provider.logout().await.expect("Failed to log out");
    assert!(!dir.path().join("token.json").exists());
}
