use std::{future::IntoFuture, net::IpAddr, sync::Arc, time::Duration};

use anyhow::anyhow;
use axum::{extract::DefaultBodyLimit, Extension, Router};
use courier_core_contact_contracts::ContactFeatureService;
use courier_core_health_contracts::HealthFeatureService;
use tokio::{net::TcpListener, sync::Notify};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

mod errors;
mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    pub health: Health,
    pub contact: Contact,
    pub config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Origins allowed to make cross origin requests. If empty, the origin of
    /// every request is allowed.
    pub allowed_origins: Vec<String>,
    /// Maximum size of a request body in bytes.
    pub body_limit: usize,
    /// Name of the deployment environment reported by `/health`.
    pub environment: String,
    /// Include the cause of delivery failures in error responses.
    pub expose_error_detail: bool,
}

/// Settings shared with the route handlers.
#[derive(Debug)]
pub(crate) struct ApiSettings {
    pub environment: String,
    pub expose_error_detail: bool,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    /// Bind to the given address and serve until SIGINT or SIGTERM is
    /// received.
    pub async fn serve(
        self,
        host: IpAddr,
        port: u16,
        shutdown_timeout: Duration,
    ) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on {}", listener.local_addr()?);
        self.serve_with_shutdown(listener, shutdown_signal(), shutdown_timeout)
            .await
    }

    /// Serve on `listener` until `signal` completes. Requests in flight are
    /// given `shutdown_timeout` to finish, after which the server stops
    /// anyway and an error is returned.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        signal: impl std::future::Future<Output = ()> + Send + 'static,
        shutdown_timeout: Duration,
    ) -> anyhow::Result<()> {
        let shutting_down = Arc::new(Notify::new());

        let server = axum::serve(listener, self.router()).with_graceful_shutdown({
            let shutting_down = Arc::clone(&shutting_down);
            async move {
                signal.await;
                info!("Shutting down, waiting up to {shutdown_timeout:?} for open requests");
                shutting_down.notify_one();
            }
        });

        let deadline = async {
            shutting_down.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        };

        tokio::select! {
            result = server.into_future() => result.map_err(Into::into),
            () = deadline => {
                warn!("Open requests did not finish in time, forcing shutdown");
                Err(anyhow!("Graceful shutdown timed out after {shutdown_timeout:?}"))
            }
        }
    }

    pub fn router(self) -> Router<()> {
        let settings = Arc::new(ApiSettings {
            environment: self.config.environment,
            expose_error_detail: self.config.expose_error_detail,
        });

        let router = Router::new()
            .merge(routes::info::router())
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .fallback(routes::info::not_found)
            .layer(Extension(settings))
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .layer(RequestBodyLimitLayer::new(self.config.body_limit));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::cors::add(router, &self.config.allowed_origins);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
