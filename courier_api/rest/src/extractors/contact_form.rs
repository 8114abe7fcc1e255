use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Response,
    Form, Json,
};
use courier_models::contact::ContactSubmission;
use serde_json::Value;

use crate::{errors::invalid_body, models::contact::normalize_submission};

/// Contact form submitted either as json object or as
/// `application/x-www-form-urlencoded` body. Json values that are not strings
/// are ignored.
pub struct ContactForm(pub ContactSubmission);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for ContactForm {
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let fields = if is_form(request.headers()) {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, state)
                .await
                .map_err(|err| invalid_body(err.body_text()))?;
            fields
        } else {
            let Json(fields) = Json::<HashMap<String, Value>>::from_request(request, state)
                .await
                .map_err(|err| invalid_body(err.body_text()))?;
            fields
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(value) => Some((key, value)),
                    _ => None,
                })
                .collect()
        };

        Ok(Self(normalize_submission(&fields)))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| {
            content_type
                .trim_start()
                .starts_with("application/x-www-form-urlencoded")
        })
}
