//! Wire types exchanged with the Hostup DNS API.
//!
//! Responses may contain more fields than modelled here; unknown fields are
//! ignored. Record content can be either a single value or a list of values
//! (multi-string TXT records, for example), see [`RecordContent`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default TTL used for ACME challenge records.
pub const DEFAULT_TTL: u32 = 300;

/// A DNS zone owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// The hosting service the zone belongs to.
    pub service_id: i64,
    /// Zone (domain) ID within the service.
    pub domain_id: i64,
    /// Zone apex, e.g. `example.com`.
    pub name: String,
}

/// Response of `GET /dns`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zones {
    /// Services that own at least one zone.
    #[serde(default)]
    pub service_ids: Vec<i64>,
    /// All zones, in API listing order.
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Response of `GET /service/{service_id}/dns/{domain_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDetails {
    /// The hosting service the zone belongs to.
    pub service_id: i64,
    /// Zone apex.
    pub name: String,
    /// All records of the zone, in API order.
    #[serde(default)]
    pub records: Vec<Record>,
}

/// A single scalar value in record content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

/// Record content: one value or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordContent {
    Single(Scalar),
    Multiple(Vec<Scalar>),
}

impl RecordContent {
    /// The values in order; a single value yields a one-element list.
    pub fn values(&self) -> Vec<String> {
        match self {
            RecordContent::Single(value) => vec![value.to_string()],
            RecordContent::Multiple(values) => values.iter().map(ToString::to_string).collect(),
        }
    }
}

impl From<&str> for RecordContent {
    fn from(value: &str) -> Self {
        RecordContent::Single(value.into())
    }
}

impl From<String> for RecordContent {
    fn from(value: String) -> Self {
        RecordContent::Single(value.into())
    }
}

impl From<Vec<String>> for RecordContent {
    fn from(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            RecordContent::Single(values.remove(0).into())
        } else {
            RecordContent::Multiple(values.into_iter().map(Scalar::from).collect())
        }
    }
}

impl fmt::Display for RecordContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values().join(" "))
    }
}

/// A DNS record inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record ID, used for deletion.
    pub id: i64,
    /// Owning zone ID.
    pub domain_id: i64,
    /// Fully-qualified record name.
    pub name: String,
    /// Record type (A, TXT, MX, ...).
    #[serde(rename = "type")]
    pub record_type: String,
    /// One value, or several for multi-string records.
    pub content: RecordContent,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Priority for MX and SRV records, otherwise 0.
    #[serde(default)]
    pub priority: i64,
    /// Last change, epoch seconds.
    #[serde(default)]
    pub change_date: i64,
}

/// Payload for creating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    /// Fully-qualified record name.
    pub name: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Priority for MX and SRV records.
    pub priority: i64,
    /// Record type (A, TXT, MX, ...).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Sent as one `content` form field per value.
    pub content: RecordContent,
}

impl RecordRequest {
    /// Creates a request for an arbitrary record type.
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<RecordContent>,
        ttl: u32,
        priority: i64,
    ) -> Self {
        Self {
            name: name.into(),
            ttl,
            priority,
            record_type: record_type.into(),
            content: content.into(),
        }
    }

    /// Creates a TXT record request with [`DEFAULT_TTL`].
    pub fn txt(name: impl Into<String>, content: impl Into<RecordContent>) -> Self {
        Self::new(name, "TXT", content, DEFAULT_TTL, 0)
    }

    /// Form-encoded key/value pairs. List content is sent as repeated `content` keys.
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("name", self.name.clone()),
            ("ttl", self.ttl.to_string()),
            ("priority", self.priority.to_string()),
            ("type", self.record_type.clone()),
        ];
        pairs.extend(
            self.content
                .values()
                .into_iter()
                .map(|value| ("content", value)),
        );
        pairs
    }
}

/// Response of record create and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Whether the API accepted the change.
    pub success: bool,
    /// The record as stored, when the API echoes it.
    #[serde(default)]
    pub record: Option<RecordRequest>,
    /// Informational `[code, message]` pairs.
    #[serde(default)]
    pub info: Vec<Vec<String>>,
}

/// A record together with the zone it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMatch {
    /// The zone whose listing contained the record.
    pub zone: Zone,
    /// The matching record.
    pub record: Record,
}
