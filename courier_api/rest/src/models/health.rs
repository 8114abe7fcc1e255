use chrono::{DateTime, Utc};
use serde::Serialize;

use super::serialize_timestamp;

#[derive(Debug, Serialize)]
pub struct ApiHealth {
    /// `HEALTHY`, or `DEGRADED` if the smtp server could not be reached.
    pub status: &'static str,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Uptime in whole seconds.
    pub uptime: u64,
    pub email_configured: bool,
    pub email_reachable: Option<bool>,
    pub environment: String,
    pub version: &'static str,
}
