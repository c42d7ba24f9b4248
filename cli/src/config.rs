//! Configuration management for the command line tool.

use fieldlist_engine::Limits;
use std::env;

/// Default log filter when `FIELDLIST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "fieldlist=info,fieldlist_engine=warn";

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Decoding limits applied to every input
    pub limits: Limits,
    /// `tracing` filter directives
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut limits = Limits::default();

        if let Some(raw) = lookup("FIELDLIST_MAX_INPUT_SIZE") {
            limits.max_input_size = parse_usize("FIELDLIST_MAX_INPUT_SIZE", raw)?;
        }
        if let Some(raw) = lookup("FIELDLIST_MAX_DEPTH") {
            limits.max_nesting_depth = parse_usize("FIELDLIST_MAX_DEPTH", raw)?;
        }

        let log_filter = lookup("FIELDLIST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self { limits, log_filter })
    }
}

fn parse_usize(var: &'static str, raw: String) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}
