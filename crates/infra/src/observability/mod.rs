//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use inkpost_domain::{InkpostError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// # Errors
/// Returns `InkpostError::Config` if the level is not a valid filter
/// directive, or `InkpostError::Internal` if a subscriber is already
/// installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry.with(fmt::layer().json().with_target(true).with_thread_ids(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false).with_thread_ids(false)).try_init()
    };

    result.map_err(|e| InkpostError::Internal(format!("tracing already initialised: {e}")))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            InkpostError::Config(format!("Invalid log level '{}': {e}", config.level))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_error() {
        let config = LoggingConfig { level: "inkpost_infra=debug".into(), json: true };

        // Another test may have installed a subscriber first; either way the
        // second call must fail without panicking.
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(InkpostError::Internal(_))));
    }

    #[test]
    fn invalid_level_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig { level: "inkpost=loud".into(), json: false };
        assert!(matches!(build_filter(&config), Err(InkpostError::Config(_))));
    }
}
