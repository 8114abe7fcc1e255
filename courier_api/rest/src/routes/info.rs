use std::collections::BTreeMap;

use axum::{
    http::{header::ORIGIN, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use chrono::Utc;

use crate::models::info::{ApiCorsTest, ApiInfo, ApiNotFound};

pub fn router() -> Router<()> {
    Router::new()
        .route("/", routing::get(info))
        .route("/test", routing::get(cors_test))
        .route("/favicon.ico", routing::get(|| async { StatusCode::NO_CONTENT }))
}

async fn info() -> Response {
    Json(ApiInfo {
        message: "🚀 API de contato - ONLINE!",
        status: "FUNCIONANDO",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BTreeMap::from([
            ("email", "POST /enviar-email"),
            ("health", "GET /health"),
            ("test", "GET /test"),
        ]),
        cors_enabled: true,
        timestamp: Utc::now(),
    })
    .into_response()
}

async fn cors_test(method: Method, headers: HeaderMap) -> Response {
    let origin = headers
        .get(ORIGIN)
        .map(|origin| String::from_utf8_lossy(origin.as_bytes()).into_owned())
        .unwrap_or_else(|| "sem-origin".into());

    Json(ApiCorsTest {
        message: "✅ CORS funcionando!",
        origin,
        method: method.to_string(),
        timestamp: Utc::now(),
    })
    .into_response()
}

pub async fn not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiNotFound {
            sucesso: false,
            mensagem: "Endpoint não encontrado",
            path: uri.path().into(),
            method: method.to_string(),
            available_endpoints: BTreeMap::from([
                ("GET /", "Informações da API"),
                ("GET /health", "Status do servidor"),
                ("GET /test", "Teste CORS"),
                ("POST /enviar-email", "Envio de formulário"),
            ]),
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}
