use std::time::Duration;

use anyhow::anyhow;
use courier_email_contracts::{Email, EmailBody, EmailError, EmailService};
use courier_models::{email_address::EmailAddressWithName, Sensitive};
use courier_utils::Apply;
use lettre::{
    message::{header::ContentType, MultiPart},
    transport::smtp::{
        self,
        authentication::Credentials,
        response::{Category, Code, Detail, Severity},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, trace};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    account: Option<Account>,
    timeout: Duration,
}

#[derive(Debug, Clone)]
struct Account {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

/// Login for the smtp server. The `from` mailbox is used as sender of every
/// outgoing email.
#[derive(Debug, Clone)]
pub struct SmtpAccount {
    pub from: EmailAddressWithName,
    pub username: String,
    pub password: Sensitive<String>,
}

impl EmailServiceImpl {
    /// Create the service. Without an `account` the service stays usable but
    /// reports itself as not configured.
    ///
    /// `timeout` bounds both connection checks and submissions.
    pub fn new(url: &str, account: Option<SmtpAccount>, timeout: Duration) -> anyhow::Result<Self> {
        let account = account
            .map(|account| {
                let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?
                    .credentials(Credentials::new(account.username, account.password.0))
                    .timeout(Some(timeout))
                    .build();
                anyhow::Ok(Account {
                    from: account.from,
                    transport,
                })
            })
            .transpose()?;

        Ok(Self { account, timeout })
    }

    fn account(&self) -> Result<&Account, EmailError> {
        self.account.as_ref().ok_or(EmailError::NotConfigured)
    }
}

impl EmailService for EmailServiceImpl {
    fn is_configured(&self) -> bool {
        self.account.is_some()
    }

    async fn send(&self, email: Email) -> Result<String, EmailError> {
        let account = self.account()?;

        let message_id = new_message_id(&account.from);
        let message =
            build_message(&account.from, email, message_id.clone()).map_err(EmailError::Message)?;

        debug!(%message_id, "submitting email");
        let response = tokio::time::timeout(self.timeout, account.transport.send(message))
            .await
            .map_err(|_| EmailError::Timeout)?
            .map_err(classify)?;
        trace!(code = %response.code(), "smtp server responded");

        if !response.is_positive() {
            return Err(EmailError::Other(anyhow!(
                "smtp server did not accept the email: {}",
                response.code()
            )));
        }

        Ok(message_id)
    }

    /// The check runs in its own session which is closed with `QUIT`, so a
    /// following [`send`](EmailService::send) logs in again.
    async fn ping(&self) -> Result<(), EmailError> {
        let account = self.account()?;

        tokio::time::timeout(self.timeout, account.transport.test_connection())
            .await
            .map_err(|_| EmailError::Timeout)?
            .map_err(classify)?
            .then_some(())
            .ok_or_else(|| EmailError::Connection(anyhow!("Failed to ping smtp server")))
    }
}

fn new_message_id(from: &EmailAddressWithName) -> String {
    format!("<{}@{}>", Uuid::new_v4(), from.email().domain())
}

fn build_message(
    from: &EmailAddressWithName,
    email: Email,
    message_id: String,
) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .message_id(Some(message_id))
        .from(from.0.clone())
        .to(email.recipient.0)
        .apply_map(email.reply_to, |builder, reply_to| builder.reply_to(reply_to.0))
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text)?,
        EmailBody::Html(html) => builder.header(ContentType::TEXT_HTML).body(html)?,
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))?
        }
    };

    Ok(message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Auth,
    Connection,
    Timeout,
    Unknown,
}

fn classify(err: smtp::Error) -> EmailError {
    match failure_class(&err) {
        FailureClass::Auth => EmailError::Auth(err.into()),
        FailureClass::Connection => EmailError::Connection(err.into()),
        FailureClass::Timeout => EmailError::Timeout,
        FailureClass::Unknown => EmailError::Other(err.into()),
    }
}

fn failure_class(err: &smtp::Error) -> FailureClass {
    if err.is_timeout() {
        return FailureClass::Timeout;
    }

    if let Some(class) = err.status().map(status_class) {
        return class;
    }

    match io_error_kind(err) {
        Some(std::io::ErrorKind::TimedOut) => FailureClass::Timeout,
        Some(_) => FailureClass::Connection,
        None if err.is_tls() => FailureClass::Connection,
        None => FailureClass::Unknown,
    }
}

/// 454, 530, 534, 535 and 538 are the replies defined for failed or
/// insufficient authentication.
fn status_class(code: Code) -> FailureClass {
    let auth = matches!(
        (code.severity, code.category, code.detail),
        (Severity::TransientNegativeCompletion, Category::MailSystem, Detail::Four)
            | (
                Severity::PermanentNegativeCompletion,
                Category::Unspecified3,
                Detail::Zero | Detail::Four | Detail::Five | Detail::Eight
            )
    );

    if auth {
        FailureClass::Auth
    } else if code.severity == Severity::TransientNegativeCompletion {
        FailureClass::Connection
    } else {
        FailureClass::Unknown
    }
}

fn io_error_kind(err: &smtp::Error) -> Option<std::io::ErrorKind> {
    let mut source = std::error::Error::source(err);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Some(io_err.kind());
        }
        source = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(severity: Severity, category: Category, detail: Detail) -> Code {
        Code::new(severity, category, detail)
    }

    #[test]
    fn auth_status_codes() {
        use Severity::{
            PermanentNegativeCompletion as Permanent, TransientNegativeCompletion as Transient,
        };

        for code in [
            code(Transient, Category::MailSystem, Detail::Four),
            code(Permanent, Category::Unspecified3, Detail::Zero),
            code(Permanent, Category::Unspecified3, Detail::Four),
            code(Permanent, Category::Unspecified3, Detail::Five),
            code(Permanent, Category::Unspecified3, Detail::Eight),
        ] {
            assert_eq!(status_class(code), FailureClass::Auth, "{code}");
        }
    }

    #[test]
    fn transient_status_codes() {
        for code in [
            code(
                Severity::TransientNegativeCompletion,
                Category::Connections,
                Detail::One,
            ),
            code(
                Severity::TransientNegativeCompletion,
                Category::MailSystem,
                Detail::Zero,
            ),
        ] {
            assert_eq!(status_class(code), FailureClass::Connection, "{code}");
        }
    }

    #[test]
    fn other_status_codes() {
        for code in [
            code(
                Severity::PermanentNegativeCompletion,
                Category::MailSystem,
                Detail::Zero,
            ),
            code(
                Severity::PermanentNegativeCompletion,
                Category::MailSystem,
                Detail::Four,
            ),
        ] {
            assert_eq!(status_class(code), FailureClass::Unknown, "{code}");
        }
    }

    #[test]
    fn message_id_uses_sender_domain() {
        let from = "portfolio@mail.example.com".parse().unwrap();

        let message_id = new_message_id(&from);

        assert!(message_id.starts_with('<'));
        assert!(message_id.ends_with("@mail.example.com>"));
        assert_ne!(message_id, new_message_id(&from));
    }

    #[test]
    fn build_alternative_message() {
        // Arrange
        let from = "Portfolio <portfolio@example.com>".parse().unwrap();
        let email = Email {
            recipient: "owner@example.com".parse().unwrap(),
            subject: "Orçamento - Ana".into(),
            body: EmailBody::Alternative {
                text: "Olá".into(),
                html: "<p>Olá</p>".into(),
            },
            reply_to: Some("Ana <ana@example.com>".parse().unwrap()),
        };

        // Act
        let message = build_message(&from, email, "<id@example.com>".into()).unwrap();

        // Assert
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Message-ID: <id@example.com>"));
        assert!(formatted.contains("Reply-To: Ana <ana@example.com>"));
        assert!(formatted.contains("To: owner@example.com"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/plain"));
        assert!(formatted.contains("text/html"));
    }

    #[test]
    fn build_text_message_without_reply_to() {
        // Arrange
        let from = "portfolio@example.com".parse().unwrap();
        let email = Email {
            recipient: "owner@example.com".parse().unwrap(),
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("It works".into()),
            reply_to: None,
        };

        // Act
        let message = build_message(&from, email, "<id@example.com>".into()).unwrap();

        // Assert
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(!formatted.contains("Reply-To"));
        assert!(formatted.contains("Content-Type: text/plain"));
    }
}
