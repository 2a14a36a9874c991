//! Remote Source Data Types
//!
//! The message record as served by the external API, plus the page envelope it comes in.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single message, kept exactly as the remote source returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// One page of the remote listing.
///
/// `total` is the population the source claims to hold. It is optional on the wire; the
/// cache falls back to the number of fetched items when it is missing.
///
/// Items are decoded one by one. A record that does not decode is dropped with a warning
/// and counted in `skipped`, so one bad record never costs the rest of the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawMessagePage")]
pub struct MessagePage {
    pub items: Vec<Message>,
    pub total: Option<usize>,
    /// Records present on the wire that could not be decoded.
    pub skipped: usize,
}

impl MessagePage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of remote records this page covers, decodable or not.
    pub fn consumed(&self) -> usize {
        self.items.len() + self.skipped
    }
}

#[derive(Deserialize)]
struct RawMessagePage {
    #[serde(default)]
    items: Vec<serde_json::Value>,
    #[serde(default)]
    total: Option<usize>,
}

impl From<RawMessagePage> for MessagePage {
    fn from(raw: RawMessagePage) -> Self {
        let mut items = Vec::with_capacity(raw.items.len());
        let mut skipped = 0;

        for value in raw.items {
            match serde_json::from_value::<Message>(value) {
                Ok(message) => items.push(message),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping undecodable message record: {}", e);
                }
            }
        }

        Self {
            items,
            total: raw.total,
            skipped,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Seconds(i64),
    FractionalSeconds(f64),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTimestamp::deserialize(deserializer)?;
    let parsed = match &raw {
        RawTimestamp::Text(text) => parse_timestamp(text),
        RawTimestamp::Seconds(secs) => Utc.timestamp_opt(*secs, 0).single(),
        RawTimestamp::FractionalSeconds(secs) => from_fractional_seconds(*secs),
    };

    parsed.ok_or_else(|| serde::de::Error::custom("invalid message timestamp"))
}

/// Parses an ISO-8601 timestamp.
///
/// Offsets (including a trailing `Z`) are honoured; a timestamp without one is read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(with_offset.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn from_fractional_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(whole as i64, nanos).single()
}
