//! Access-log line parsing.
//!
//! Lines are JSON objects in the shape written by Caddy's access logger, with
//! a handful of tolerated variants (timestamp encoding, byte-count field name,
//! referrer spelling). Only invalid JSON is a hard failure; a field that is
//! missing or of the wrong type degrades to its empty value.

use crate::ingest::client_ip::resolve_client_ip;
use crate::ingest::entry::ParsedEntry;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Timestamp layouts without an explicit offset, tried after RFC 3339 and read as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Header names in lookup order for the referrer; the second is the common misspelling.
const REFERRER_HEADERS: &[&str] = &["Referer", "Referrer"];

const USER_AGENT_HEADER: &str = "User-Agent";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("log line is not a JSON object")]
    NotAnObject,
}

pub fn parse_line(line: &str) -> Result<ParsedEntry, ParseError> {
    let value: Value = serde_json::from_str(line.trim())?;
    if !value.is_object() {
        return Err(ParseError::NotAnObject);
    }

    let raw = RawLine::deserialize(value)?;
    Ok(raw.into_entry())
}

//-----------------------------------------------------------------------------
// Raw schema
//-----------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLine {
    #[serde(deserialize_with = "lenient")]
    ts: Option<RawTimestamp>,
    #[serde(deserialize_with = "lenient")]
    request: Option<RawRequest>,
    #[serde(deserialize_with = "lenient")]
    status: Option<u16>,
    #[serde(deserialize_with = "lenient")]
    size: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    bytes_written: Option<u64>,
    /// Seconds.
    #[serde(deserialize_with = "lenient")]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Epoch(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRequest {
    #[serde(deserialize_with = "lenient")]
    pub(crate) remote_ip: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) client_ip: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) host: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) method: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) uri: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) proto: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub(crate) headers: Option<HashMap<String, HeaderValues>>,
}

/// Headers normally arrive as `name -> [values]`, but a bare string is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum HeaderValues {
    Many(Vec<String>),
    One(String),
    Other(IgnoredAny),
}

impl HeaderValues {
    fn first(&self) -> Option<&str> {
        match self {
            HeaderValues::Many(values) => values.first().map(String::as_str),
            HeaderValues::One(value) => Some(value.as_str()),
            HeaderValues::Other(_) => None,
        }
    }
}

impl RawRequest {
    /// Exact-case lookup first, then a case-insensitive scan.
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        let headers = self.headers.as_ref()?;

        if let Some(values) = headers.get(name) {
            return values.first();
        }

        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
    }
}

/// Deserializes a field, turning a type mismatch into `None` instead of an error.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

//-----------------------------------------------------------------------------
// Normalization
//-----------------------------------------------------------------------------

impl RawLine {
    fn into_entry(self) -> ParsedEntry {
        let request = self.request.unwrap_or_default();

        let bytes = match self.bytes_written {
            Some(n) if n > 0 => n,
            _ => self.size.unwrap_or(0),
        };

        let referrer = REFERRER_HEADERS
            .iter()
            .find_map(|name| request.header(name).filter(|v| !v.is_empty()))
            .unwrap_or_default()
            .to_string();

        let user_agent = request
            .header(USER_AGENT_HEADER)
            .unwrap_or_default()
            .to_string();

        let duration_ms = self
            .duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|secs| secs * 1_000.0)
            .unwrap_or(0.0);

        ParsedEntry {
            timestamp: self.ts.and_then(RawTimestamp::into_utc).unwrap_or_default(),
            client_ip: resolve_client_ip(&request),
            host: request.host.unwrap_or_default(),
            method: request.method.unwrap_or_default(),
            path: request.uri.unwrap_or_default(),
            proto: request.proto.unwrap_or_default(),
            status: self.status.unwrap_or(0),
            bytes,
            referrer,
            user_agent,
            duration_ms,
        }
    }
}

impl RawTimestamp {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Epoch(secs) => from_epoch_seconds(secs),
            RawTimestamp::Text(text) => parse_timestamp_text(&text),
        }
    }
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }

    let whole = secs.floor();
    let mut nanos = ((secs - whole) * 1e9).round() as u32;
    let mut whole = whole as i64;
    if nanos >= 1_000_000_000 {
        whole += 1;
        nanos = 0;
    }

    DateTime::from_timestamp(whole, nanos)
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Some(ts) = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(ts.and_utc());
    }

    // Some shippers quote the epoch value.
    text.parse::<f64>().ok().and_then(from_epoch_seconds)
}
