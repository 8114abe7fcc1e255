use std::sync::Arc;

use anyhow::anyhow;
use chrono::FixedOffset;
use courier_core_contact_contracts::{
    ContactDelivered, ContactDeliveryFailure, ContactFailureKind, ContactFeatureService,
    ContactSendMessageError,
};
use courier_email_contracts::{Email, EmailBody, EmailError, EmailService};
use courier_models::{
    contact::{ContactSubmission, ValidatedContact},
    email_address::{EmailAddress, EmailAddressWithName},
};
use courier_shared_contracts::time::TimeService;
use courier_templates_contracts::{
    ContactNotificationTemplate, ContactNotificationTextTemplate, TemplateService,
};
use tracing::{debug, error, info};

pub use locale::format_received_at;

mod locale;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Email, Template> {
    pub time: Time,
    pub email: Email,
    pub template: Template,
    pub config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Mailbox that receives the notifications. `None` if neither a recipient
    /// nor an smtp account is configured.
    pub recipient: Option<Arc<EmailAddressWithName>>,
    pub default_subject: Arc<str>,
    pub utc_offset: FixedOffset,
    pub site_name: Arc<str>,
    pub site_url: Option<Arc<str>>,
    /// Phone number in international format without `+`.
    pub whatsapp_number: Option<Arc<str>>,
}

impl<TimeS, EmailS, TemplateS> ContactFeatureService
    for ContactFeatureServiceImpl<TimeS, EmailS, TemplateS>
where
    TimeS: TimeService,
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactDelivered, ContactSendMessageError> {
        let contact = submission.validate().map_err(|errors| {
            debug!(?errors, "rejected contact submission");
            ContactSendMessageError::Invalid(errors)
        })?;

        let message_id = self.dispatch(&contact).await.map_err(|(kind, err)| {
            error!(
                error_code = kind.error_code(),
                "Failed to deliver contact message: {err:#}"
            );
            ContactDeliveryFailure {
                kind,
                timestamp: self.time.now(),
                source: err,
            }
        })?;

        info!(%message_id, "contact message delivered");

        Ok(ContactDelivered {
            message_id,
            timestamp: self.time.now(),
        })
    }
}

type DispatchError = (ContactFailureKind, anyhow::Error);

impl<TimeS, EmailS, TemplateS> ContactFeatureServiceImpl<TimeS, EmailS, TemplateS>
where
    TimeS: TimeService,
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn dispatch(&self, contact: &ValidatedContact) -> Result<String, DispatchError> {
        let recipient = self
            .config
            .recipient
            .as_deref()
            .filter(|_| self.email.is_configured())
            .ok_or_else(|| {
                (
                    ContactFailureKind::Configuration,
                    anyhow!("No smtp credentials configured"),
                )
            })?;

        let email = self.compose(contact, recipient.clone())?;

        self.email.ping().await.map_err(email_failure)?;
        self.email.send(email).await.map_err(email_failure)
    }

    fn compose(
        &self,
        contact: &ValidatedContact,
        recipient: EmailAddressWithName,
    ) -> Result<Email, DispatchError> {
        let message_format = |err: anyhow::Error| (ContactFailureKind::MessageFormat, err);

        let reply_to = contact
            .email
            .parse::<EmailAddress>()
            .map_err(|err| message_format(err.into()))?
            .with_name(contact.name.as_str());

        let subject_text = contact.subject.as_ref().map(|s| s.to_string());
        let subject = format!(
            "{} - {}",
            subject_text.as_deref().unwrap_or(&self.config.default_subject),
            *contact.name
        );
        let received_at = format_received_at(self.time.now(), self.config.utc_offset);

        let html = self
            .template
            .render(&ContactNotificationTemplate {
                name: contact.name.to_string(),
                email: contact.email.to_string(),
                subject: subject_text.clone(),
                message: contact.message.to_string(),
                received_at: received_at.clone(),
                reply_url: self.reply_url(contact, &subject),
                whatsapp_url: self.whatsapp_url(subject_text.as_deref()),
                site_name: self.config.site_name.to_string(),
                site_url: self.config.site_url.as_deref().map(Into::into),
            })
            .map_err(message_format)?;

        let text = self
            .template
            .render(&ContactNotificationTextTemplate {
                name: contact.name.to_string(),
                email: contact.email.to_string(),
                subject: subject_text,
                message: contact.message.to_string(),
                received_at,
                site_name: self.config.site_name.to_string(),
            })
            .map_err(message_format)?;

        Ok(Email {
            recipient,
            subject,
            body: EmailBody::Alternative { text, html },
            reply_to: Some(reply_to),
        })
    }

    fn reply_url(&self, contact: &ValidatedContact, subject: &str) -> String {
        let greeting = format!("Olá {},\n\nObrigado pelo seu contato!\n\n", *contact.name);
        format!(
            "mailto:{}?subject={}&body={}",
            *contact.email,
            urlencoding::encode(&format!("Re: {subject}")),
            urlencoding::encode(&greeting)
        )
    }

    fn whatsapp_url(&self, subject: Option<&str>) -> Option<String> {
        let number = self.config.whatsapp_number.as_deref()?;
        let text = format!(
            "Olá! Recebi sua mensagem através do {}. Vamos conversar sobre: {}",
            self.config.site_name,
            subject.unwrap_or("seu projeto")
        );
        Some(format!(
            "https://wa.me/{number}?text={}",
            urlencoding::encode(&text)
        ))
    }
}

fn email_failure(err: EmailError) -> DispatchError {
    let kind = match err {
        EmailError::NotConfigured => ContactFailureKind::Configuration,
        EmailError::Auth(_) => ContactFailureKind::Auth,
        EmailError::Connection(_) => ContactFailureKind::Connection,
        EmailError::Timeout => ContactFailureKind::Timeout,
        EmailError::Message(_) => ContactFailureKind::MessageFormat,
        EmailError::Other(_) => ContactFailureKind::Unknown,
    };
    (kind, err.into())
}
