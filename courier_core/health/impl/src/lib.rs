use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use courier_core_health_contracts::{HealthFeatureService, HealthStatus};
use courier_email_contracts::EmailService;
use courier_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Time, Email> {
    time: Time,
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    /// How long the result of an smtp connection check is reused.
    pub cache_ttl: Duration,
}

#[derive(Debug)]
struct State {
    started_at: DateTime<Utc>,
    cache: RwLock<Option<CachedReachability>>,
}

#[derive(Debug)]
struct CachedReachability {
    reachable: bool,
    timestamp: DateTime<Utc>,
}

impl<Time: TimeService, Email> HealthFeatureServiceImpl<Time, Email> {
    /// Create the service. Uptime is measured from this call.
    pub fn new(time: Time, email: Email, config: HealthFeatureConfig) -> Self {
        let started_at = time.now();
        Self {
            time,
            email,
            config,
            state: Arc::new(State {
                started_at,
                cache: RwLock::new(None),
            }),
        }
    }
}

impl<Time, Email> HealthFeatureService for HealthFeatureServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let uptime = (now - self.state.started_at).to_std().unwrap_or_default();
        let email_configured = self.email.is_configured();

        let email_reachable = if email_configured {
            Some(self.email_reachable(now).await)
        } else {
            None
        };

        HealthStatus {
            uptime,
            email_configured,
            email_reachable,
        }
    }
}

impl<Time, Email> HealthFeatureServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    async fn email_reachable(&self, now: DateTime<Utc>) -> bool {
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.reachable;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.reachable;
        }

        let reachable = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        cache_guard
            .insert(CachedReachability {
                reachable,
                timestamp: now,
            })
            .reachable
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use courier_email_contracts::{EmailError, MockEmailService};
    use courier_shared_contracts::time::MockTimeService;
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> HealthFeatureConfig {
        HealthFeatureConfig {
            cache_ttl: Duration::from_secs(10),
        }
    }

    fn time_at(times: Vec<DateTime<Utc>>) -> MockTimeService {
        let mut times = times.into_iter();
        let mut time = MockTimeService::new();
        time.expect_now()
            .returning(move || times.next().expect("unexpected call to now"));
        time
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn after(seconds: i64) -> DateTime<Utc> {
        start() + chrono::Duration::seconds(seconds)
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let sut = HealthFeatureServiceImpl::new(
            time_at(vec![start(), after(90)]),
            MockEmailService::new().with_is_configured(false),
            config(),
        );

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(
            result,
            HealthStatus {
                uptime: Duration::from_secs(90),
                email_configured: false,
                email_reachable: None,
            }
        );
    }

    #[tokio::test]
    async fn reachable() {
        // Arrange
        let sut = HealthFeatureServiceImpl::new(
            time_at(vec![start(), after(1)]),
            MockEmailService::new()
                .with_is_configured(true)
                .with_ping(Ok(())),
            config(),
        );

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(
            result,
            HealthStatus {
                uptime: Duration::from_secs(1),
                email_configured: true,
                email_reachable: Some(true),
            }
        );
    }

    #[tokio::test]
    async fn cached() {
        // Arrange
        let sut = HealthFeatureServiceImpl::new(
            time_at(vec![start(), after(1), after(5)]),
            MockEmailService::new()
                .with_is_configured(true)
                .with_ping(Err(EmailError::Timeout)),
            config(),
        );

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first.email_reachable, Some(false));
        assert_eq!(second.email_reachable, Some(false));
        assert_eq!(second.uptime, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn cache_expired() {
        // Arrange
        let mut email = MockEmailService::new().with_is_configured(true);
        let mut results = [
            Err(EmailError::Connection(anyhow::anyhow!("connection refused"))),
            Ok(()),
        ]
        .into_iter();
        email
            .expect_ping()
            .times(2)
            .returning(move || Box::pin(std::future::ready(results.next().unwrap())));

        let sut = HealthFeatureServiceImpl::new(
            time_at(vec![start(), after(1), after(11)]),
            email,
            config(),
        );

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first.email_reachable, Some(false));
        assert_eq!(second.email_reachable, Some(true));
    }
}
