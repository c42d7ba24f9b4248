//! Unified error handling for the command line tool.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Command error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: fieldlist_engine::Error,
    },

    #[error("writing output: {0}")]
    Encode(#[from] fieldlist_engine::Error),
}

/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, CliError>;
