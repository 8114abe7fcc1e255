use std::future::Future;

use chrono::{DateTime, Utc};
use courier_models::contact::{ContactSubmission, ContactValidationError};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate a contact form submission and forward it to the operator.
    ///
    /// Every call is a single delivery attempt. Nothing is retried or
    /// queued.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<ContactDelivered, ContactSendMessageError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDelivered {
    /// Message id assigned to the outgoing email.
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("The submission is invalid: {0:?}")]
    Invalid(Vec<ContactValidationError>),
    #[error("Failed to deliver message: {0}")]
    Failed(#[from] ContactDeliveryFailure),
}

#[derive(Debug, Error)]
#[error("{kind:?} at {timestamp}: {source}")]
pub struct ContactDeliveryFailure {
    pub kind: ContactFailureKind,
    pub timestamp: DateTime<Utc>,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactFailureKind {
    /// No credentials for the outbound channel are configured.
    Configuration,
    /// The outbound channel rejected the credentials.
    Auth,
    /// The outbound channel could not be reached.
    Connection,
    /// The outbound channel did not answer in time.
    Timeout,
    /// The notification could not be composed into a valid email.
    MessageFormat,
    Unknown,
}

impl ContactFailureKind {
    /// Stable identifier reported to clients.
    pub fn error_code(self) -> &'static str {
        match self {
            Self::Configuration => "ECONFIG",
            Self::Auth => "EAUTH",
            Self::Connection => "ECONNECTION",
            Self::Timeout => "ETIMEDOUT",
            Self::MessageFormat => "EMESSAGE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the failure was caused by the submitted data rather than by the
    /// server.
    pub fn is_client_error(self) -> bool {
        matches!(self, Self::MessageFormat)
    }
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<ContactDelivered, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
