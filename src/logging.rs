//! Tracing subscriber setup for the binaries.
//!
//! Logs always go to stderr: stdout carries the MCP stdio transport.

use crate::config::{LogFormat, LoggingSettings};
use crate::errors::ServiceError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over the configured level when it is set.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, ServiceError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| ServiceError::Logging(format!("bad log level {:?}: {}", settings.level, e))),
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(settings: &LoggingSettings) -> Result<(), ServiceError> {
    let filter = build_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| ServiceError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_builds_filter() {
        let settings = LoggingSettings {
            level: "poke_battle=debug,warn".to_string(),
            format: LogFormat::Pretty,
        };
        assert!(build_filter(&settings).is_ok());
    }
}
