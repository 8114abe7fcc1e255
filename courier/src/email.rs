use anyhow::Context;
use courier_config::EmailConfig;
use courier_email_impl::{EmailServiceImpl, SmtpAccount};
use courier_models::email_address::EmailAddress;

/// Create the smtp client. Without credentials the returned service reports
/// itself as not configured.
pub fn build(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let account = config
        .credentials()
        .map(|(username, password)| {
            let from = username
                .parse::<EmailAddress>()
                .with_context(|| format!("Smtp username {username:?} is not an email address"))?
                .with_name(&config.from_name);
            anyhow::Ok(SmtpAccount {
                from,
                username: username.into(),
                password: password.clone(),
            })
        })
        .transpose()?;

    EmailServiceImpl::new(&config.smtp_url, account, *config.timeout)
        .context("Failed to configure smtp transport")
}
