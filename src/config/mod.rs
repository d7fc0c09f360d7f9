//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `APPRAISER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CALLBACK_TIMEOUT_SECS, DEFAULT_JOB_QUEUE_CAPACITY, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
};
use crate::logging::LogLevel;
use crate::scoring::StrategyKind;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `APPRAISER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `9096`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Timeout for the callback POST of an async appraisal. Default: 600s.
    pub callback_timeout: Duration,

    /// Threshold for requests that do not name a `log_level`. Default: `WARNING`.
    pub default_log_level: LogLevel,

    /// Confidence aggregation rule. Default: clamped sum.
    pub confidence_strategy: StrategyKind,

    /// Whether `drug_approval` is computed. Default: `true`.
    pub drug_approval: bool,

    /// Pending async jobs accepted before new submissions are refused. Default: `1024`.
    pub job_queue_capacity: usize,

    /// Largest accepted request body. Default: 512 MiB.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
            default_log_level: LogLevel::Warning,
            confidence_strategy: StrategyKind::ClampedSum,
            drug_approval: true,
            job_queue_capacity: DEFAULT_JOB_QUEUE_CAPACITY,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "APPRAISER_PORT";
    const ENV_BIND_ADDR: &'static str = "APPRAISER_BIND_ADDR";
    const ENV_CALLBACK_TIMEOUT_SECS: &'static str = "APPRAISER_CALLBACK_TIMEOUT_SECS";
    const ENV_DEFAULT_LOG_LEVEL: &'static str = "APPRAISER_DEFAULT_LOG_LEVEL";
    const ENV_CONFIDENCE_STRATEGY: &'static str = "APPRAISER_CONFIDENCE_STRATEGY";
    const ENV_DRUG_APPROVAL: &'static str = "APPRAISER_DRUG_APPROVAL";
    const ENV_JOB_QUEUE_CAPACITY: &'static str = "APPRAISER_JOB_QUEUE_CAPACITY";
    const ENV_MAX_BODY_BYTES: &'static str = "APPRAISER_MAX_BODY_BYTES";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let callback_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_CALLBACK_TIMEOUT_SECS,
            defaults.callback_timeout.as_secs(),
        ));
        let default_log_level = Self::parse_log_level_from_env(defaults.default_log_level)?;
        let confidence_strategy = Self::parse_strategy_from_env(defaults.confidence_strategy)?;
        let drug_approval =
            Self::parse_bool_from_env(Self::ENV_DRUG_APPROVAL, defaults.drug_approval)?;
        let job_queue_capacity = Self::parse_u64_from_env(
            Self::ENV_JOB_QUEUE_CAPACITY,
            defaults.job_queue_capacity as u64,
        ) as usize;
        let max_body_bytes =
            Self::parse_u64_from_env(Self::ENV_MAX_BODY_BYTES, defaults.max_body_bytes as u64)
                as usize;

        Ok(Self {
            port,
            bind_addr,
            callback_timeout,
            default_log_level,
            confidence_strategy,
            drug_approval,
            job_queue_capacity,
            max_body_bytes,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.callback_timeout.is_zero() {
            return Err(ConfigError::ZeroCallbackTimeout);
        }
        if self.job_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_log_level_from_env(default: LogLevel) -> Result<LogLevel, ConfigError> {
        match env::var(Self::ENV_DEFAULT_LOG_LEVEL) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidLogLevel {
                name: Self::ENV_DEFAULT_LOG_LEVEL,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_strategy_from_env(default: StrategyKind) -> Result<StrategyKind, ConfigError> {
        match env::var(Self::ENV_CONFIDENCE_STRATEGY) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::UnknownStrategy { value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let normalized = value.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(ConfigError::InvalidBool {
                        name: var_name,
                        value,
                    }),
                }
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
