//! Tests for HttpClientConfig network binding and timeouts.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use hostup_dns::hostup::{HostupError, HostupProvider};
use hostup_dns::HttpClientConfig;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::constants::FAR_FUTURE;
use crate::common::*;

#[tokio::test]
async fn test_local_address_binding_to_localhost_works() {
    let server = setup_mock_server().await;
    let dir = tempdir().unwrap();
    write_cached_token(&dir, &jwt_expiring_at(FAR_FUTURE));

    Mock::given(method("GET"))
        .and(path("/dns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_zones_response(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.local_address, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));

    let provider =
        HostupProvider::with_http_config(credentials_for(&server, &cache_path(&dir)), config)
            .expect("Provider creation with localhost binding should succeed");
    provider
        .list_zones()
        .await
        .expect("Request from localhost should succeed");
}

#[tokio::test]
async fn test_local_address_binding_to_unavailable_ip_fails_on_connect() {
    let server = setup_mock_server().await;
    let dir = tempdir().unwrap();
    write_cached_token(&dir, &jwt_expiring_at(FAR_FUTURE));

    // 192.0.2.1 is from TEST-NET-1 (RFC 5737) and should not be assigned to any interface
    let config = HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));

    // binding happens on connect, not on client creation
    let provider =
        HostupProvider::with_http_config(credentials_for(&server, &cache_path(&dir)), config)
            .expect("Client creation should succeed even with unavailable IP");

    let result = provider.list_zones().await;
    assert!(
        matches!(result, Err(HostupError::Request(_))),
        "Request should fail when bound to an unavailable IP, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_timeout_applies_to_requests() {
    let server = setup_mock_server().await;
    let dir = tempdir().unwrap();
    write_cached_token(&dir, &jwt_expiring_at(FAR_FUTURE));

    Mock::given(method("GET"))
        .and(path("/dns"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_zones_response(&[]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = HttpClientConfig::new().timeout(Duration::from_millis(200));
    assert_eq!(config.timeout, Some(Duration::from_millis(200)));

    let provider =
        HostupProvider::with_http_config(credentials_for(&server, &cache_path(&dir)), config)
            .unwrap();
    match provider.list_zones().await {
        Err(HostupError::Request(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[test]
fn test_combined_config_options() {
    let config = HttpClientConfig::new()
        .local_address(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(3));

    assert_eq!(config.local_address, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
    assert_eq!(config.interface, None);
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "android",
    target_os = "fuchsia",
))]
#[tokio::test]
async fn test_interface_binding_config() {
    let config = HttpClientConfig::new().interface("lo");
    assert_eq!(config.interface, Some("lo".to_string()));

    // interface binding is validated on connect
    let dir = tempdir().unwrap();
    let credentials = hostup_dns::hostup::Credentials::new(
        "user",
        "pass",
        "http://127.0.0.1:9",
        cache_path(&dir),
    );
    assert!(HostupProvider::with_http_config(credentials, config).is_ok());
}
