//! Tests for decoding API bodies into the wire types.

use hostup_dns::types::{RecordContent, RecordRequest, RecordResponse, Scalar, ZoneDetails, Zones};
use serde_json::json;

#[test]
fn test_zones_listing_ignores_unknown_fields() {
    let zones: Zones = serde_json::from_value(json!({
        "service_ids": [1001, 1002],
        "zones": [
            { "service_id": 1001, "domain_id": 11, "name": "example.com", "status": "Active" },
            { "service_id": 1002, "domain_id": 22, "name": "example.org", "dnssec": false }
        ],
        "result": "success"
    }))
    .expect("Failed to parse zones");

    assert_eq!(zones.service_ids, vec![1001, 1002]);
    assert_eq!(zones.zones.len(), 2);
    assert_eq!(zones.zones[1].domain_id, 22);
}

#[test]
fn test_zones_listing_empty_body() {
    let zones: Zones = serde_json::from_str("{}").unwrap();
    assert!(zones.zones.is_empty());
}

#[test]
fn test_zone_details_mixed_content() {
    let details: ZoneDetails = serde_json::from_value(json!({
        "service_id": 1001,
        "name": "example.com",
        "records": [
            { "id": 1, "domain_id": 11, "name": "example.com", "type": "MX",
              "content": "mail.example.com", "ttl": 3600, "priority": 10 },
            { "id": 2, "domain_id": 11, "name": "txt.example.com", "type": "TXT",
              "content": ["v=spf1", "-all"], "ttl": 300 },
            { "id": 3, "domain_id": 11, "name": "srv.example.com", "type": "SRV",
              "content": [5, 5060, "sip.example.com"], "ttl": 300 }
        ]
    }))
    .expect("Failed to parse zone details");

    assert_eq!(details.records.len(), 3);
    assert_eq!(details.records[0].priority, 10);
    assert_eq!(details.records[1].change_date, 0);
    assert_eq!(details.records[1].content.values(), vec!["v=spf1", "-all"]);
    assert_eq!(
        details.records[2].content,
        RecordContent::Multiple(vec![
            Scalar::Integer(5),
            Scalar::Integer(5060),
            Scalar::Text("sip.example.com".to_string()),
        ])
    );
}

#[test]
fn test_record_response_without_record() {
    let response: RecordResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert!(response.success);
    assert!(response.record.is_none());
    assert!(response.info.is_empty());
}

#[test]
fn test_record_request_form_pairs() {
    let request = RecordRequest::new(
        "mail.example.com",
        "MX",
        "mx1.example.com",
        3600,
        10,
    );
    assert_eq!(
        request.form_pairs(),
        vec![
            ("name", "mail.example.com".to_string()),
            ("ttl", "3600".to_string()),
            ("priority", "10".to_string()),
            ("type", "MX".to_string()),
            ("content", "mx1.example.com".to_string()),
        ]
    );
}
