//! Request-scoped logging.
//!
//! Every request gets its own [`RequestLogger`] with a threshold taken from the request's
//! `log_level`. The process-wide `tracing` subscriber is configured once at start-up from
//! `RUST_LOG` and is never touched per request.


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Severity of a request log event. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a log level name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One buffered log event, returned to synchronous callers as part of the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

/// Per-request logger.
///
/// Events below `threshold` are dropped. Accepted events go to `tracing` tagged with the
/// job id and are buffered for the response. Clones share the buffer.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    job_id: String,
    threshold: LogLevel,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RequestLogger {
    pub fn new(job_id: impl Into<String>, threshold: LogLevel) -> Self {
        Self {
            job_id: job_id.into(),
            threshold,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        let message = message.into();

        match level {
            LogLevel::Debug => tracing::debug!(job_id = %self.job_id, "{}", message),
            LogLevel::Info => tracing::info!(job_id = %self.job_id, "{}", message),
            LogLevel::Warning => tracing::warn!(job_id = %self.job_id, "{}", message),
            LogLevel::Error => tracing::error!(job_id = %self.job_id, "{}", message),
        }

        self.entries.lock().push(LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message,
        });
    }

    /// Copies out the buffered entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
