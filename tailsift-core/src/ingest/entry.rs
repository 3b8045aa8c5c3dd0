use crate::enrichment::geoip::GeoInfo;
use crate::enrichment::user_agent::UserAgentInfo;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One access-log line after parsing, before enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedEntry {
    /// Unix epoch when the line carried no usable timestamp.
    pub timestamp: DateTime<Utc>,
    pub host: String,
    pub method: String,
    pub path: String,
    pub proto: String,
    pub status: u16,
    pub bytes: u64,
    pub client_ip: String,
    pub referrer: String,
    pub user_agent: String,
    pub duration_ms: f64,
}

/// A parsed entry plus everything derived from it, ready for the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    #[serde(flatten)]
    pub entry: ParsedEntry,
    #[serde(flatten)]
    pub geo: GeoInfo,
    #[serde(flatten)]
    pub agent: UserAgentInfo,
}
