use std::sync::Arc;

use anyhow::Context;
use courier_api_rest::RestServerConfig;
use courier_config::Config;
use courier_core_contact_impl::ContactFeatureConfig;
use courier_core_health_impl::HealthFeatureConfig;
use courier_models::email_address::{EmailAddress, EmailAddressWithName};
use types::{ContactFeature, Email, HealthFeature, RestServer, Template, Time};

pub mod types;

/// Wire all services together.
pub fn rest_server(config: &Config, email: Email) -> anyhow::Result<RestServer> {
    let time = Time::default();

    let contact = ContactFeature {
        time,
        email: email.clone(),
        template: Template::default(),
        config: contact_feature_config(config)?,
    };

    let health = HealthFeature::new(
        time,
        email,
        HealthFeatureConfig {
            cache_ttl: *config.health.cache_ttl,
        },
    );

    Ok(RestServer {
        health,
        contact,
        config: rest_server_config(config),
    })
}

pub fn rest_server_config(config: &Config) -> RestServerConfig {
    RestServerConfig {
        allowed_origins: config.http.allowed_origins.clone(),
        body_limit: config.http.body_limit,
        environment: config.environment.to_string(),
        expose_error_detail: !config.environment.is_production(),
    }
}

pub fn contact_feature_config(config: &Config) -> anyhow::Result<ContactFeatureConfig> {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Arc::<str>::from)
    };

    Ok(ContactFeatureConfig {
        recipient: recipient(config)?.map(Arc::new),
        default_subject: config.contact.default_subject.as_str().into(),
        utc_offset: config.contact.utc_offset.0,
        site_name: config.contact.site_name.as_str().into(),
        site_url: non_empty(&config.contact.site_url),
        whatsapp_number: non_empty(&config.contact.whatsapp_number),
    })
}

/// The configured recipient, or the smtp account itself.
fn recipient(config: &Config) -> anyhow::Result<Option<EmailAddressWithName>> {
    if let Some(recipient) = &config.contact.recipient {
        return Ok(Some(recipient.clone().with_name(&config.email.from_name)));
    }

    config
        .email
        .credentials()
        .map(|(username, _)| {
            username
                .parse::<EmailAddress>()
                .map(|address| address.with_name(&config.email.from_name))
                .with_context(|| format!("Smtp username {username:?} is not an email address"))
        })
        .transpose()
}
