//! Error types for the data-assembly layer, configuration and the service binaries.
//!
//! The battle loop itself has no error path: once two combatants exist a battle
//! always runs to a terminal state.

use thiserror::Error;

/// Failures raised while assembling a combatant from the remote data source.
///
/// Any of these aborts a simulation before its first turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The remote source has no creature with this name
    #[error("Pokemon not found: {0}")]
    NotFound(String),
    /// The creature exists but no usable move could be assembled for it
    #[error("No move data available for {0}")]
    NoMoveData(String),
    /// Transport failure, timeout, unexpected status or undecodable body
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Short label used for structured logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "not_found",
            FetchError::NoMoveData(_) => "no_move_data",
            FetchError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Unavailable(format!("request timed out: {}", err))
        } else if err.is_decode() {
            FetchError::Unavailable(format!("malformed response: {}", err))
        } else {
            FetchError::Unavailable(err.to_string())
        }
    }
}

/// Errors raised while loading [`Settings`](crate::config::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Top-level error for the binaries.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using FetchError
pub type FetchResult<T> = Result<T, FetchError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
