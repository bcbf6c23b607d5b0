//! Process configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a default so the service starts with no environment at
//! all: no `DATABASE_URL` means the fallback tier carries every submission,
//! no `ADMIN_TOKEN` means the admin listing is closed, and a partial Resend
//! setup disables notifications. Numeric values that fail to parse fall back
//! to their defaults. Only an unrecognized `FALLBACK_STORE` is an error,
//! since guessing the wrong tier would silently change where data lands.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PRIMARY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_FALLBACK_FILE: &str = "data/submissions.json";
/// Handwritten messages arrive as PNG data URLs, well above axum's 2 MB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("FALLBACK_STORE must be `file` or `memory`, got `{0}`")]
    UnknownFallbackStore(String),
}

/// Which store backs the fallback tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackConfig {
    /// JSON document at the given path.
    File(PathBuf),
    /// Process-wide in-memory collections; lost on restart.
    Memory,
}

/// Resend credentials and addressing for submission notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    pub api_key: String,
    pub from: String,
    pub to: String,
}

impl NotifyConfig {
    /// Read `RESEND_API_KEY`, `MAIL_FROM` and `CONTACT_EMAIL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first unset variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_required("RESEND_API_KEY")?,
            from: env_required("MAIL_FROM")?,
            to: env_required("CONTACT_EMAIL")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Primary store connection string; `None` runs fallback-only.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Upper bound on one primary-store attempt before falling back.
    pub primary_timeout: Duration,
    pub fallback: FallbackConfig,
    /// Bearer token guarding the admin listing.
    pub admin_token: Option<String>,
    pub notify: Option<NotifyConfig>,
    /// Directory of static frontend assets served at `/`.
    pub static_dir: Option<PathBuf>,
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownFallbackStore`] for an unrecognized
    /// `FALLBACK_STORE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let fallback = match env_non_empty("FALLBACK_STORE").as_deref() {
            None | Some("file") => FallbackConfig::File(
                env_non_empty("FALLBACK_FILE").map_or_else(|| PathBuf::from(DEFAULT_FALLBACK_FILE), PathBuf::from),
            ),
            Some("memory") => FallbackConfig::Memory,
            Some(other) => return Err(ConfigError::UnknownFallbackStore(other.to_owned())),
        };

        let notify = match NotifyConfig::from_env() {
            Ok(notify) => Some(notify),
            Err(e) => {
                warn!(error = %e, "email notifications disabled");
                None
            }
        };

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database_url: env_non_empty("DATABASE_URL"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            primary_timeout: Duration::from_millis(env_parse("PRIMARY_TIMEOUT_MS", DEFAULT_PRIMARY_TIMEOUT_MS)),
            fallback,
            admin_token: env_non_empty("ADMIN_TOKEN"),
            notify,
            static_dir: env_non_empty("STATIC_DIR").map(PathBuf::from),
            max_body_bytes: env_parse("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        })
    }
}

/// Parse `key` as `T`, returning `default` when unset or unparseable.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Value of `key` with surrounding whitespace removed; blank counts as unset.
pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_required(key: &'static str) -> Result<String, ConfigError> {
    env_non_empty(key).ok_or(ConfigError::Missing(key))
}
