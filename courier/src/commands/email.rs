use anyhow::Context;
use clap::Subcommand;
use courier_config::Config;
use courier_email_contracts::{Email, EmailBody, EmailService};
use courier_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
    /// Connect and authenticate to the smtp server without sending anything
    Ping,
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
            EmailCommand::Ping => ping(config).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let email_service = email::build(&config.email)?;

    let message_id = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("Email deliverability seems to be working!".into()),
            reply_to: None,
        })
        .await
        .context("Failed to send email")?;

    info!(%message_id, "Email sent");

    Ok(())
}

async fn ping(config: Config) -> anyhow::Result<()> {
    let email_service = email::build(&config.email)?;

    email_service
        .ping()
        .await
        .context("Failed to connect to smtp server")?;

    info!("Smtp server is reachable and accepted the credentials");

    Ok(())
}
