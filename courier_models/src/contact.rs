use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::macros::nutype_string;

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Raw form fields as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: Option<String>,
}

/// A submission that passed all intake rules. Every field is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    pub name: ContactName,
    pub email: ContactEmail,
    pub subject: Option<ContactSubject>,
    pub message: ContactMessage,
}

nutype_string!(ContactName(sanitize(trim), validate(len_char_min = 2)));
nutype_string!(ContactEmail(sanitize(trim), validate(regex = CONTACT_EMAIL_REGEX)));
nutype_string!(ContactSubject(sanitize(trim), validate(not_empty)));
nutype_string!(ContactMessage(sanitize(trim), validate(len_char_min = 10)));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ContactValidationError {
    #[error("Nome deve ter pelo menos 2 caracteres")]
    NameTooShort,
    #[error("Email inválido")]
    InvalidEmail,
    #[error("Mensagem deve ter pelo menos 10 caracteres")]
    MessageTooShort,
}

impl ContactValidationError {
    /// Name of the form field this error refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::NameTooShort => "name",
            Self::InvalidEmail => "email",
            Self::MessageTooShort => "message",
        }
    }
}

impl ContactSubmission {
    /// Check every intake rule and collect all violations.
    ///
    /// A blank subject is treated as absent.
    pub fn validate(self) -> Result<ValidatedContact, Vec<ContactValidationError>> {
        let mut errors = Vec::new();

        let name = ContactName::try_new(self.name)
            .map_err(|_| errors.push(ContactValidationError::NameTooShort))
            .ok();
        let email = ContactEmail::try_new(self.email)
            .map_err(|_| errors.push(ContactValidationError::InvalidEmail))
            .ok();
        let message = ContactMessage::try_new(self.message)
            .map_err(|_| errors.push(ContactValidationError::MessageTooShort))
            .ok();
        let subject = self
            .subject
            .and_then(|subject| ContactSubject::try_new(subject).ok());

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) => Ok(ValidatedContact {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(errors),
        }
    }
}
