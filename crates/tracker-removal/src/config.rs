//! Removal service configuration.
//!
//! Configuration is loaded from environment variables with defaults that
//! match production behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracker_org::Locale;

/// Environment variable naming the fallback response locale.
pub const ENV_DEFAULT_LOCALE: &str = "TRACKER_DEFAULT_LOCALE";
/// Environment variable toggling the in-transaction claim re-check.
pub const ENV_RECHECK_CLAIMS: &str = "TRACKER_RECHECK_CLAIMS";
/// Environment variable switching log output to JSON.
pub const ENV_LOG_JSON: &str = "TRACKER_LOG_JSON";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Organization removal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Locale used when a request carries none, or one that is unsupported.
    pub default_locale: Locale,

    /// Re-assert sole claimancy of each domain inside the transaction.
    pub recheck_claims: bool,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::En,
            recheck_claims: true,
            log_json: false,
        }
    }
}

impl RemovalConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// Environment variables:
    /// - `TRACKER_DEFAULT_LOCALE`: `en` or `fr` (default: en)
    /// - `TRACKER_RECHECK_CLAIMS`: re-check domain claims in the transaction (default: true)
    /// - `TRACKER_LOG_JSON`: JSON log output (default: false)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            default_locale: std::env::var(ENV_DEFAULT_LOCALE)
                .ok()
                .and_then(|s| Locale::parse(&s))
                .unwrap_or(default.default_locale),
            recheck_claims: std::env::var(ENV_RECHECK_CLAIMS)
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.recheck_claims),
            log_json: std::env::var(ENV_LOG_JSON)
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.log_json),
        }
    }

    /// Load configuration from environment variables, rejecting bad values.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup, rejecting bad values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let default_locale = match lookup(ENV_DEFAULT_LOCALE) {
            Some(tag) => Locale::parse(&tag).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_DEFAULT_LOCALE.to_string(),
                message: format!("unsupported locale '{tag}'"),
            })?,
            None => default.default_locale,
        };

        let config = Self {
            default_locale,
            recheck_claims: parse_flag(&lookup, ENV_RECHECK_CLAIMS, default.recheck_claims)?,
            log_json: parse_flag(&lookup, ENV_LOG_JSON, default.log_json)?,
        };
        Ok(config)
    }

    /// Resolve a request's language tag, falling back to the default locale.
    pub fn resolve_locale(&self, tag: Option<&str>) -> Locale {
        tag.and_then(Locale::parse).unwrap_or(self.default_locale)
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected true/false, got '{other}'"),
        }),
    }
}
