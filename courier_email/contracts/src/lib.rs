use std::future::Future;

use courier_models::email_address::EmailAddressWithName;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Whether credentials for the smtp server are available. Without them
    /// every call to [`send`](EmailService::send) or
    /// [`ping`](EmailService::ping) fails with [`EmailError::NotConfigured`].
    fn is_configured(&self) -> bool;

    /// Submit the email and return the message id assigned to it.
    fn send(&self, email: Email) -> impl Future<Output = Result<String, EmailError>> + Send;

    /// Connect and authenticate to the smtp server without sending anything.
    fn ping(&self) -> impl Future<Output = Result<(), EmailError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub body: EmailBody,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    Html(String),
    /// `multipart/alternative` with a plain text fallback.
    Alternative { text: String, html: String },
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("No smtp credentials configured.")]
    NotConfigured,
    #[error("The smtp server rejected the credentials: {0}")]
    Auth(#[source] anyhow::Error),
    #[error("Could not connect to the smtp server: {0}")]
    Connection(#[source] anyhow::Error),
    #[error("The smtp server did not respond in time.")]
    Timeout,
    #[error("The email could not be formatted: {0}")]
    Message(#[source] anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_is_configured(mut self, configured: bool) -> Self {
        self.expect_is_configured().return_const(configured);
        self
    }

    pub fn with_send(mut self, email: Email, result: Result<String, EmailError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, result: Result<(), EmailError>) -> Self {
        self.expect_ping()
            .once()
            .return_once(move || Box::pin(std::future::ready(result)));
        self
    }
}
