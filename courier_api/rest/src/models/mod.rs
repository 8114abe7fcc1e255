use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

pub mod contact;
pub mod health;
pub mod info;

/// Serialize a timestamp as an rfc 3339 string with millisecond precision,
/// e.g. `2026-10-19T14:30:00.000Z`.
pub fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
