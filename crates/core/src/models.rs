use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bot records
// ---------------------------------------------------------------------------

/// Persisted on/off state for a single bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotRecord {
    /// Caller-chosen identifier (never auto-generated).
    #[serde(rename = "idBot")]
    pub id: i64,
    pub is_on: bool,
    /// Time of the most recent write, truncated to whole seconds.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl BotRecord {
    pub fn new(id: i64, is_on: bool, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            is_on,
            updated_at: updated_at.trunc_subsecs(0),
        }
    }
}

/// Result of a toggle: the record as written plus the state it was flipped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggledBot {
    #[serde(flatten)]
    pub record: BotRecord,
    pub toggled_from: bool,
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Current UTC time at second precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Formats a timestamp as ISO-8601 UTC with a trailing `Z` and no fractional seconds.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|ts| ts.with_timezone(&Utc).trunc_subsecs(0))
}

/// Serde adapter for the `YYYY-MM-DDTHH:MM:SSZ` wire format.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ts: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}
