use std::collections::HashMap;

use chrono::{DateTime, Utc};
use courier_models::contact::{ContactSubmission, ContactValidationError};
use serde::Serialize;

use super::serialize_timestamp;

/// Accepted names for each field of the contact form, in order of precedence.
pub const NAME_FIELDS: &[&str] = &["nome", "name"];
pub const EMAIL_FIELDS: &[&str] = &["email"];
pub const MESSAGE_FIELDS: &[&str] = &["mensagem", "message"];
pub const SUBJECT_FIELDS: &[&str] = &["assunto", "subject"];

pub const SUCCESS_MESSAGE: &str = "✅ Mensagem enviada com sucesso! Obrigado pelo contato.";

/// Map the raw form fields onto a submission. For every field the first
/// non-empty value among its aliases wins.
pub fn normalize_submission(fields: &HashMap<String, String>) -> ContactSubmission {
    let lookup = |aliases: &[&str]| {
        aliases
            .iter()
            .filter_map(|alias| fields.get(*alias))
            .find(|value| !value.is_empty())
            .cloned()
    };

    ContactSubmission {
        name: lookup(NAME_FIELDS).unwrap_or_default(),
        email: lookup(EMAIL_FIELDS).unwrap_or_default(),
        message: lookup(MESSAGE_FIELDS).unwrap_or_default(),
        subject: lookup(SUBJECT_FIELDS),
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactDelivered {
    pub sucesso: bool,
    pub mensagem: &'static str,
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "processTime")]
    pub process_time: String,
}

#[derive(Debug, Serialize)]
pub struct ApiContactInvalid {
    pub sucesso: bool,
    pub mensagem: String,
    pub errors: Vec<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl ApiContactInvalid {
    pub fn new(errors: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sucesso: false,
            mensagem: format!("Dados inválidos: {}", errors.join(", ")),
            errors,
            timestamp,
        }
    }

    pub fn from_validation_errors(
        errors: &[ContactValidationError],
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(errors.iter().map(ToString::to_string).collect(), timestamp)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactFailed {
    pub sucesso: bool,
    pub mensagem: &'static str,
    pub error_code: &'static str,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "processTime", skip_serializing_if = "Option::is_none")]
    pub process_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    #[test]
    fn portuguese_fields() {
        // Arrange
        let fields = fields(&[
            ("nome", "Ana"),
            ("email", "ana@example.com"),
            ("mensagem", "Olá, gostaria de um orçamento."),
            ("assunto", "Orçamento"),
        ]);

        // Act
        let result = normalize_submission(&fields);

        // Assert
        assert_eq!(
            result,
            ContactSubmission {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                message: "Olá, gostaria de um orçamento.".into(),
                subject: Some("Orçamento".into()),
            }
        );
    }

    #[test]
    fn english_fields() {
        // Arrange
        let fields = fields(&[
            ("name", "Ana"),
            ("email", "ana@example.com"),
            ("message", "Olá, gostaria de um orçamento."),
        ]);

        // Act
        let result = normalize_submission(&fields);

        // Assert
        assert_eq!(
            result,
            ContactSubmission {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                message: "Olá, gostaria de um orçamento.".into(),
                subject: None,
            }
        );
    }

    #[test]
    fn portuguese_alias_takes_precedence() {
        // Arrange
        let fields = fields(&[("nome", "Ana"), ("name", "Anna")]);

        // Act
        let result = normalize_submission(&fields);

        // Assert
        assert_eq!(result.name, "Ana");
    }

    #[test]
    fn empty_alias_falls_through() {
        // Arrange
        let fields = fields(&[("mensagem", ""), ("message", "Olá, tudo bem?")]);

        // Act
        let result = normalize_submission(&fields);

        // Assert
        assert_eq!(result.message, "Olá, tudo bem?");
    }

    #[test]
    fn missing_fields() {
        // Act
        let result = normalize_submission(&HashMap::new());

        // Assert
        assert_eq!(result, ContactSubmission::default());
    }

    #[test]
    fn invalid_message_lists_errors() {
        // Act
        let result = ApiContactInvalid::from_validation_errors(
            &[
                ContactValidationError::NameTooShort,
                ContactValidationError::InvalidEmail,
            ],
            Utc::now(),
        );

        // Assert
        assert_eq!(
            result.mensagem,
            "Dados inválidos: Nome deve ter pelo menos 2 caracteres, Email inválido"
        );
        assert_eq!(result.errors.len(), 2);
    }
}
