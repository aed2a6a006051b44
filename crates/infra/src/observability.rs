//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level so operators can raise
//! verbosity without touching config files.

use cvm_domain::{CvmError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` if set and valid, the configured level
/// otherwise.
///
/// # Errors
/// Returns `CvmError::Config` if the configured level is not a valid filter.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.level)
            .map_err(|e| CvmError::Config(format!("Invalid log level {:?}: {e}", config.level)))
    })
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `CvmError::Config` if the filter is invalid or a global subscriber
/// is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| CvmError::Config(format!("Failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_is_config_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "cvm=verbose".into(), json: false };
        assert!(matches!(env_filter(&config), Err(CvmError::Config(_))));
    }

    #[test]
    fn second_install_fails_cleanly() {
        let config = LoggingConfig { level: "warn".into(), json: true };
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
