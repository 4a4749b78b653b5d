//! # Node Configuration
//!
//! Runtime configuration, loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SR_CHALLENGE_WINDOW_SECS` | 300 | Maximum challenge age |
//! | `SR_PROTOCOL_TAG` | `starRegistry` | Last field of every challenge |
//! | `SR_SIGNATURE_SCHEME` | `bitcoin` | `bitcoin` or `ethereum` ownership proofs |
//! | `SR_LOG_LEVEL` or `RUST_LOG` | `info` | Log filter directive |
//! | `SR_JSON_LOGS` | false | Emit JSON log lines |

use sr_star_ledger::{LedgerConfig, UnknownSignatureScheme};
use std::num::ParseIntError;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Ledger configuration.
    pub ledger: LedgerConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `sr_star_ledger=debug`.
    pub level: String,
    /// Emit JSON instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("{key}={value:?} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl NodeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NodeConfig::default();

        if let Some(value) = lookup("SR_CHALLENGE_WINDOW_SECS") {
            config.ledger.challenge_window_secs =
                value.trim().parse().map_err(|e: ParseIntError| ConfigError::InvalidValue {
                    key: "SR_CHALLENGE_WINDOW_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(tag) = lookup("SR_PROTOCOL_TAG") {
            if tag.is_empty() || tag.contains(':') {
                return Err(ConfigError::InvalidValue {
                    key: "SR_PROTOCOL_TAG",
                    value: tag,
                    reason: "must be non-empty and contain no ':'".to_string(),
                });
            }
            config.ledger.protocol_tag = tag;
        }

        if let Some(value) = lookup("SR_SIGNATURE_SCHEME") {
            config.ledger.signature_scheme =
                value.parse().map_err(|e: UnknownSignatureScheme| ConfigError::InvalidValue {
                    key: "SR_SIGNATURE_SCHEME",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(level) = lookup("SR_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.logging.level = level;
        }

        if let Some(value) = lookup("SR_JSON_LOGS") {
            config.logging.json = parse_flag(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: "SR_JSON_LOGS",
                value: value.clone(),
                reason: "expected true/false".to_string(),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
