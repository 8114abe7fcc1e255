use std::{
    collections::HashMap,
    net::IpAddr,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use chrono::FixedOffset;
use config::{Environment as EnvSource, File, FileFormat};
use courier_models::{email_address::EmailAddress, Sensitive};
use serde::Deserialize;

pub use duration::Duration;

mod duration;

/// Defaults for every setting, embedded into the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_ENV: &str = "COURIER_CONFIG";

const ENV_PREFIX: &str = "COURIER";

/// Variables recognized for compatibility with existing deployments, mapped to
/// the config key they override.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("EMAIL_USER", "email.username"),
    ("EMAIL_PASS", "email.password"),
    ("PORT", "http.port"),
    ("NODE_ENV", "environment"),
];

/// Load the config from the embedded defaults, the files listed in
/// `COURIER_CONFIG` and the process environment.
pub fn load() -> anyhow::Result<Config> {
    let env = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect::<HashMap<_, _>>();

    let paths = env
        .get(CONFIG_PATHS_ENV)
        .map(|paths| {
            paths
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    load_from(&paths, env)
}

/// Load the config from the embedded defaults, the given files (later files
/// take precedence) and the given environment variables.
pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: HashMap<String, String>,
) -> anyhow::Result<Config> {
    let defaults = config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths
        .iter()
        .try_fold(defaults, |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("http.allowed_origins")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

    LEGACY_ENV
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            builder.set_override_option(key, env.get(var).cloned())
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub environment: Environment,
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything except `production` is treated as a development deployment.
impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(if s.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub body_limit: usize,
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub username: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub from_name: String,
    pub timeout: Duration,
}

impl EmailConfig {
    /// Username and password, if both are set and not blank.
    pub fn credentials(&self) -> Option<(&str, &Sensitive<String>)> {
        let username = self.username.as_deref().filter(|u| !u.trim().is_empty())?;
        let password = self.password.as_ref().filter(|p| !p.trim().is_empty())?;
        Some((username.trim(), password))
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Falls back to the smtp username if not set.
    pub recipient: Option<EmailAddress>,
    pub default_subject: String,
    pub utc_offset: UtcOffset,
    pub site_name: String,
    pub site_url: Option<String>,
    pub whatsapp_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

/// Fixed offset from utc, written as `+hh:mm` or `-hh:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset(pub FixedOffset);

impl<'de> Deserialize<'de> for UtcOffset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FixedOffset::from_str(s.trim())
            .map(Self)
            .map_err(|err| serde::de::Error::custom(format!("Invalid utc offset {s:?}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, time::Duration as StdDuration};

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    fn no_paths() -> &'static [&'static Path] {
        &[]
    }

    #[test]
    fn load_default_config() {
        // Act
        let config = load_from(no_paths(), HashMap::new()).unwrap();

        // Assert
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.http.body_limit, 10 * 1024 * 1024);
        assert_eq!(*config.http.shutdown_timeout, StdDuration::from_secs(30));
        assert_eq!(*config.email.timeout, StdDuration::from_secs(15));
        assert_eq!(config.email.credentials(), None);
        assert_eq!(config.contact.recipient, None);
        assert_eq!(config.contact.default_subject, "📧 Portfolio Contato");
        assert_eq!(
            config.contact.utc_offset,
            UtcOffset(FixedOffset::west_opt(3 * 3600).unwrap())
        );
        assert_eq!(config.contact.whatsapp_number, None);
        assert_eq!(*config.health.cache_ttl, StdDuration::from_secs(10));
    }

    #[test]
    fn prefixed_env_overrides_defaults() {
        // Arrange
        let env = env(&[
            ("COURIER__HTTP__PORT", "8080"),
            ("COURIER__HTTP__ALLOWED_ORIGINS", "https://a.example,https://b.example"),
            ("COURIER__EMAIL__TIMEOUT", "1m 30s"),
            ("COURIER__CONTACT__RECIPIENT", "owner@example.com"),
            ("COURIER__CONTACT__SITE_NAME", "Meu Site"),
            ("COURIER_CONFIG", "ignored"),
        ]);

        // Act
        let config = load_from(no_paths(), env).unwrap();

        // Assert
        assert_eq!(config.http.port, 8080);
        assert_eq!(
            config.http.allowed_origins,
            ["https://a.example", "https://b.example"]
        );
        assert_eq!(*config.email.timeout, StdDuration::from_secs(90));
        assert_eq!(
            config.contact.recipient,
            Some("owner@example.com".parse().unwrap())
        );
        assert_eq!(config.contact.site_name, "Meu Site");
    }

    #[test]
    fn legacy_env() {
        // Arrange
        let env = env(&[
            ("EMAIL_USER", "portfolio@gmail.com"),
            ("EMAIL_PASS", "app password"),
            ("PORT", "4000"),
            ("NODE_ENV", "production"),
            ("COURIER__HTTP__PORT", "8080"),
        ]);

        // Act
        let config = load_from(no_paths(), env).unwrap();

        // Assert
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.http.port, 4000);
        let (username, password) = config.email.credentials().unwrap();
        assert_eq!(username, "portfolio@gmail.com");
        assert_eq!(password.0, "app password");
    }

    #[test]
    fn unknown_environment_is_development() {
        // Act
        let config = load_from(no_paths(), env(&[("NODE_ENV", "staging")])).unwrap();

        // Assert
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn blank_credentials_are_ignored() {
        // Arrange
        let env = env(&[("EMAIL_USER", "portfolio@gmail.com"), ("EMAIL_PASS", "  ")]);

        // Act
        let config = load_from(no_paths(), env).unwrap();

        // Assert
        assert_eq!(config.email.credentials(), None);
    }

    #[test]
    fn config_file() {
        // Arrange
        let path = std::env::temp_dir().join(format!("courier-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[contact]\nutc_offset = \"+01:00\"\nwhatsapp_number = \"5511999999999\""
        )
        .unwrap();

        // Act
        let config = load_from(&[&path], HashMap::new());
        std::fs::remove_file(&path).unwrap();

        // Assert
        let config = config.unwrap();
        assert_eq!(
            config.contact.utc_offset,
            UtcOffset(FixedOffset::east_opt(3600).unwrap())
        );
        assert_eq!(config.contact.whatsapp_number.as_deref(), Some("5511999999999"));
        assert_eq!(config.contact.site_name, "Portfolio");
    }

    #[test]
    fn missing_config_file() {
        // Act
        let result = load_from(&[Path::new("/nonexistent/courier.toml")], HashMap::new());

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn invalid_utc_offset() {
        // Act
        let result = load_from(
            no_paths(),
            env(&[("COURIER__CONTACT__UTC_OFFSET", "Brasília")]),
        );

        // Assert
        assert!(result.is_err());
    }
}
