use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::serialize_timestamp;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub cors_enabled: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiCorsTest {
    pub message: &'static str,
    pub origin: String,
    pub method: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiNotFound {
    pub sucesso: bool,
    pub mensagem: &'static str,
    pub path: String,
    pub method: String,
    pub available_endpoints: BTreeMap<&'static str, &'static str>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}
