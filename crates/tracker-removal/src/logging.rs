//! Logging setup for hosts embedding the removal service.
//!
//! Audit lines are emitted under the `audit` target, so the default filter
//! keeps them at `info` alongside the tracker crates.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::RemovalConfig;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "tracker_removal=info,tracker_store=info,audit=info";

/// Install a global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &RemovalConfig) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if config.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this binary that installs a global subscriber.
    #[test]
    fn test_init_logging_installs_once() {
        assert!(init_logging(&RemovalConfig::default()).is_ok());
        tracing::info!(target: "audit", "logging initialized");

        let json = RemovalConfig {
            log_json: true,
            ..RemovalConfig::default()
        };
        assert!(init_logging(&json).is_err());
    }
}
