//! Runtime configuration.
//!
//! Sources, in the order an application usually layers them:
//! - `RuntimeConfig::default()`
//! - a TOML file (`RuntimeConfig::load`)
//! - environment overrides (`RuntimeConfig::with_env_overrides`):
//!   - `WAYFINDER_ON_TYPE_MISMATCH=report|panic`
//!   - `WAYFINDER_EVENT_CAPACITY=<n>`

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_ON_TYPE_MISMATCH: &str = "WAYFINDER_ON_TYPE_MISMATCH";
pub const ENV_EVENT_CAPACITY: &str = "WAYFINDER_EVENT_CAPACITY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// What to do when a flow's root is not the type a readiness slot expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Log and return `FlowError::RootTypeMismatch`; the callback never runs.
    #[default]
    Report,
    /// Treat it as fatal.
    Panic,
}

impl FromStr for MismatchPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(MismatchPolicy::Report),
            "panic" | "fatal" => Ok(MismatchPolicy::Panic),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_ON_TYPE_MISMATCH,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub on_type_mismatch: MismatchPolicy,
    /// Buffer of the coordinator's navigation event channel.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            on_type_mismatch: MismatchPolicy::Report,
            event_capacity: 64,
        }
    }
}

impl RuntimeConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(source)?;
        config.validated()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Apply environment overrides. Invalid values are ignored with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_ON_TYPE_MISMATCH) {
            match raw.parse() {
                Ok(policy) => self.on_type_mismatch = policy,
                Err(e) => tracing::warn!("ignoring {}: {}", ENV_ON_TYPE_MISMATCH, e),
            }
        }

        if let Ok(raw) = std::env::var(ENV_EVENT_CAPACITY) {
            match parse_capacity(&raw) {
                Ok(capacity) => self.event_capacity = capacity,
                Err(e) => tracing::warn!("ignoring {}: {}", ENV_EVENT_CAPACITY, e),
            }
        }

        self
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "event_capacity",
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}

fn parse_capacity(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_EVENT_CAPACITY,
            value: raw.to_string(),
        }),
    }
}
