//! # configs
//!
//! Layered settings: built-in defaults, then an optional config file, then
//! `MARKETPLACE__SECTION__KEY` environment variables (a `.env` file is read
//! first when present).

use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Config file used when `MARKETPLACE_CONFIG` is unset. Any extension
/// understood by `config` works (`local.yaml`, `local.toml`, ...).
pub const DEFAULT_CONFIG_PATH: &str = "config/local";

const ENV_PREFIX: &str = "MARKETPLACE";

/// One year.
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub env: String,
    pub http: HttpSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub listing: ListingSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct HttpSettings {
    pub address: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing key. Rotating it logs every user out.
    pub jwt_secret: SecretString,
    pub token_ttl_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListingSettings {
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Settings {
    /// Loads settings from `.env`, the config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path =
            std::env::var("MARKETPLACE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        tracing::debug!(%path, "loading configuration");

        let builder = Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Every setting except the signing secret has a default.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("env", "local")?
            .set_default("http.address", "0.0.0.0:8080")?
            .set_default("http.request_timeout_secs", 5)?
            .set_default("database.url", "sqlite://marketplace.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.token_ttl_secs", 24 * 60 * 60)?
            .set_default("listing.page_size", 10)?
            .set_default("log.format", "pretty")?
            .set_default("log.filter", "info")?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".into()));
        }
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.auth.token_ttl_secs) {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_secs must be between 1 and {MAX_TOKEN_TTL_SECS}"
            )));
        }
        if self.listing.page_size == 0 {
            return Err(ConfigError::Invalid("listing.page_size must be positive".into()));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }
}
