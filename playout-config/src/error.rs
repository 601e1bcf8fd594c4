//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the playout configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or has the wrong shape
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// The configuration parsed but a required value is unusable
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Type alias for results that can return a ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;
