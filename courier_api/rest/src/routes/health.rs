use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use chrono::Utc;
use courier_core_health_contracts::{HealthFeatureService, HealthStatus};

use crate::{models::health::ApiHealth, ApiSettings};

pub fn router(service: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state(service)
}

async fn health(
    service: State<Arc<impl HealthFeatureService>>,
    Extension(settings): Extension<Arc<ApiSettings>>,
) -> Response {
    let HealthStatus {
        uptime,
        email_configured,
        email_reachable,
    } = service.get_status().await;

    let status = match email_reachable {
        Some(false) => "DEGRADED",
        _ => "HEALTHY",
    };

    Json(ApiHealth {
        status,
        timestamp: Utc::now(),
        uptime: uptime.as_secs(),
        email_configured,
        email_reachable,
        environment: settings.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
    .into_response()
}
