//! Logging setup for the playout binaries
//!
//! Each binary initialises tracing exactly once, right after parsing its
//! command line, and before anything that could emit log output.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Environment variable overriding the default log filter
pub const LOG_LEVEL_ENV: &str = "PLAYOUT_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// Compact `info` output on stderr
    Development,
    /// Verbose `debug` output with source locations
    Debug,
}

impl LoggingMode {
    /// Pick `Debug` when the debug flag is set, `Development` otherwise
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            LoggingMode::Debug
        } else {
            LoggingMode::Development
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// # Environment Variables
///
/// - `PLAYOUT_LOG_LEVEL`: override the filter (e.g. `debug`, `api_client=trace`)
/// - `RUST_LOG`: used when `PLAYOUT_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Development => {
            let subscriber = Registry::default()
                .with(fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact())
                .with(create_env_filter("info"));

            subscriber.try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let subscriber = Registry::default()
                .with(fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true))
                .with(create_env_filter("debug"));

            subscriber.try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Create an environment filter with fallback to default level
fn create_env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}
