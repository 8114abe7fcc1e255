use courier_config::Config;
use courier_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = email::build(&config.email)?;

    if email.is_configured() {
        info!("Checking connection to smtp server");
        match email.ping().await {
            Ok(()) => info!("Smtp server is ready to accept messages"),
            Err(err) => warn!("Smtp server check failed, starting anyway: {err}"),
        }
    } else {
        warn!("No smtp credentials configured, contact messages will be rejected");
    }

    let server = environment::rest_server(&config, email)?;

    info!(
        environment = %config.environment,
        "Starting http server on {}:{}",
        config.http.host,
        config.http.port
    );
    server
        .serve(
            config.http.host,
            config.http.port,
            *config.http.shutdown_timeout,
        )
        .await
}
