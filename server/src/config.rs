//! Configuration management for the server process.
//!
//! Loads configuration from environment variables with sensible defaults:
//!
//! | Variable                 | Default                        |
//! |--------------------------|--------------------------------|
//! | `HOST`                   | `0.0.0.0`                      |
//! | `PORT`                   | `8080`                         |
//! | `SNAPSHOT_PATH`          | `database/events.json`         |
//! | `SNAPSHOT_INTERVAL_SECS` | `0` (no periodic saves)        |
//! | `METRICS_ENABLED`        | `true`                         |
//! | `RUST_LOG`               | `info,ticket_reservation=debug`|

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_FILTER: &str = "info,ticket_reservation=debug";

/// Errors from configuration loading.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// Parse failure
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Snapshot file location
    pub snapshot_path: PathBuf,
    /// Period between automatic saves, `None` to save only on shutdown
    pub snapshot_interval: Option<Duration>,
    /// Install a Prometheus recorder and serve `GET /metrics`
    pub metrics_enabled: bool,
    /// `tracing-subscriber` filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            snapshot_path: PathBuf::from("database/events.json"),
            snapshot_interval: None,
            metrics_enabled: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let interval_secs: u64 = parse(&lookup, "SNAPSHOT_INTERVAL_SECS")?.unwrap_or(0);

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            snapshot_path: lookup("SNAPSHOT_PATH").map_or(defaults.snapshot_path, PathBuf::from),
            snapshot_interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs)),
            metrics_enabled: parse(&lookup, "METRICS_ENABLED")?.unwrap_or(defaults.metrics_enabled),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// `host:port` to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}
