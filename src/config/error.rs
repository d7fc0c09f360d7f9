//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Log level name is not one of `ERROR`, `WARNING`, `INFO`, `DEBUG`.
    #[error("invalid log level '{value}' in {name}")]
    InvalidLogLevel { name: &'static str, value: String },

    /// Confidence strategy name is unknown.
    #[error("unknown confidence strategy '{value}': expected 'clamped_sum' or 'mean'")]
    UnknownStrategy { value: String },

    /// Boolean flag could not be parsed.
    #[error("invalid boolean '{value}' in {name}")]
    InvalidBool { name: &'static str, value: String },

    /// Callback timeout of zero seconds would fail every delivery.
    #[error("callback timeout must be greater than zero")]
    ZeroCallbackTimeout,

    /// A zero-capacity job queue cannot accept work.
    #[error("job queue capacity must be greater than zero")]
    ZeroQueueCapacity,
}
