//! Shared configuration and logging for the playout binaries
//!
//! Configuration and the tracing subscriber are set up explicitly once at
//! process start and handed to whatever needs them; nothing in this crate
//! runs at load time.

mod config;
mod error;
pub mod logging;

pub use config::{Config, GeneralConfig, PlayoutConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
pub use error::{ConfigError, Result};
pub use logging::{init_logging, LoggingError, LoggingMode};
