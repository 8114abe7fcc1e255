use std::{sync::Arc, time::Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use chrono::Utc;
use courier_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use tracing::debug;

use crate::{
    errors::delivery_failure,
    extractors::contact_form::ContactForm,
    models::contact::{ApiContactDelivered, ApiContactInvalid, SUCCESS_MESSAGE},
    ApiSettings,
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/enviar-email", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    Extension(settings): Extension<Arc<ApiSettings>>,
    ContactForm(submission): ContactForm,
) -> Response {
    let started = Instant::now();
    let result = service.send_message(submission).await;
    let process_time = format!("{}ms", started.elapsed().as_millis());

    match result {
        Ok(delivered) => Json(ApiContactDelivered {
            sucesso: true,
            mensagem: SUCCESS_MESSAGE,
            message_id: delivered.message_id,
            timestamp: delivered.timestamp,
            process_time,
        })
        .into_response(),
        Err(ContactSendMessageError::Invalid(errors)) => {
            debug!(?errors, "invalid contact submission");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiContactInvalid::from_validation_errors(&errors, Utc::now())),
            )
                .into_response()
        }
        Err(ContactSendMessageError::Failed(failure)) => {
            delivery_failure(failure, process_time, settings.expose_error_detail)
        }
    }
}
