//! Error types for the bootstrap sequence

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort the engine bootstrap
///
/// None of these are retried here; restarting the bootstrap is left to the
/// process supervisor.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The engine binary could not report its version
    #[error("Failed to query engine version: {0}")]
    VersionQuery(String),

    /// No control script exists for the detected version
    #[error("Control script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// The engine configuration could not be generated
    #[error("Failed to generate engine config: {0}")]
    ConfigGeneration(String),

    /// Replacing the current process with the engine failed
    #[error("Failed to launch {}: {source}", binary.display())]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local filesystem lookups failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Type alias for results that can return a BootstrapError
pub type Result<T> = std::result::Result<T, BootstrapError>;
