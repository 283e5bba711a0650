//! Structured logging setup using tracing.
//!
//! Library code only emits `tracing` events; hosts call [`init_logging`] once
//! to install a subscriber. `RUST_LOG` takes precedence over the configured
//! level.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter {filter:?}: {message}")]
    Filter { filter: String, message: String },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Filter for a configured level such as "info" or "DEBUG".
pub fn filter_for_level(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level.to_lowercase()).map_err(|e| LoggingError::Filter {
        filter: level.to_string(),
        message: e.to_string(),
    })
}

/// Build the filter: `RUST_LOG` if set, else the configured level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => filter_for_level(&config.level),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))?;
    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_level() {
        assert_eq!(filter_for_level("DEBUG").unwrap().to_string(), "debug");
        assert_eq!(filter_for_level("warn").unwrap().to_string(), "warn");
    }

    #[test]
    fn test_filter_for_bad_level() {
        let result = filter_for_level("dashkit=loudest");
        assert!(matches!(result, Err(LoggingError::Filter { .. })));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(LoggingError::Init(_))));
    }
}
