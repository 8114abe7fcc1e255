use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use courier_core_contact_contracts::{ContactDeliveryFailure, ContactFailureKind};

use crate::models::contact::{ApiContactFailed, ApiContactInvalid};

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiContactFailed {
            sucesso: false,
            mensagem: failure_message(ContactFailureKind::Unknown),
            error_code: ContactFailureKind::Unknown.error_code(),
            timestamp: Utc::now(),
            process_time: None,
            detail: None,
        }),
    )
        .into_response()
}

/// Response for a request body that could not be parsed at all.
pub fn invalid_body(detail: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiContactInvalid::new(vec![detail], Utc::now())),
    )
        .into_response()
}

pub fn delivery_failure(
    failure: ContactDeliveryFailure,
    process_time: String,
    expose_detail: bool,
) -> Response {
    let status = if failure.kind.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = ApiContactFailed {
        sucesso: false,
        mensagem: failure_message(failure.kind),
        error_code: failure.kind.error_code(),
        timestamp: failure.timestamp,
        process_time: Some(process_time),
        detail: expose_detail.then(|| format!("{:#}", failure.source)),
    };

    (status, Json(response)).into_response()
}

pub fn failure_message(kind: ContactFailureKind) -> &'static str {
    match kind {
        ContactFailureKind::Configuration => "Servidor não configurado para envio de emails",
        ContactFailureKind::Auth => "Erro de autenticação do email - Verifique credenciais",
        ContactFailureKind::Connection | ContactFailureKind::Timeout => {
            "Erro de conexão com servidor de email"
        }
        ContactFailureKind::MessageFormat => "Erro na formatação da mensagem",
        ContactFailureKind::Unknown => "Erro interno do servidor",
    }
}
