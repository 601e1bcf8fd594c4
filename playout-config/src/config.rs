//! Playout configuration file
//!
//! Both binaries read the same YAML file. Only the `general` section is
//! required; everything under `playout` has a default matching a stock
//! installation.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of the configuration file when nothing overrides it
pub const DEFAULT_CONFIG_PATH: &str = "/etc/airtime/airtime.yml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`]
pub const CONFIG_PATH_ENV: &str = "PLAYOUT_CONFIG_PATH";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub playout: PlayoutConfig,
}

/// Connection details for the scheduling server
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Public base URL of the scheduling server, e.g. `http://localhost:8080`
    pub public_url: String,
    /// Shared API key sent with every request
    pub api_key: String,
    /// Read timeout for API calls
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
}

/// Settings for launching and feeding the playout engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayoutConfig {
    /// Engine binary
    pub liquidsoap_bin: PathBuf,
    /// `argv[0]` the engine is started with
    pub program_name: String,
    /// Sandbox directory exported as `HOME` to the engine
    pub home_dir: PathBuf,
    /// Directory holding one sub-directory per engine version.
    /// `None` means the directory of the running executable.
    pub script_dir: Option<PathBuf>,
    /// Control script file name inside each version directory
    pub script_name: String,
    /// Where the generated engine config is written
    pub liquidsoap_cfg_path: PathBuf,
    /// Log file the engine is told to write to
    pub liquidsoap_log_file: PathBuf,
    /// How many times to ask for stream settings before giving up
    pub stream_setting_attempts: u32,
    /// Pause between stream setting attempts
    pub stream_setting_retry_delay_secs: u64,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            liquidsoap_bin: PathBuf::from("/usr/bin/liquidsoap"),
            program_name: "libretime-liquidsoap".to_string(),
            home_dir: PathBuf::from("/var/tmp/airtime/pypo/"),
            script_dir: None,
            script_name: "ls_script.liq".to_string(),
            liquidsoap_cfg_path: PathBuf::from("/etc/airtime/liquidsoap.cfg"),
            liquidsoap_log_file: PathBuf::from("/var/log/airtime/pypo-liquidsoap/ls_script.log"),
            stream_setting_attempts: 10,
            stream_setting_retry_delay_secs: 3,
        }
    }
}

fn default_api_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load and validate the configuration file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config path: explicit flag, then environment, then default
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Read timeout for API calls
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.general.api_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.general.public_url.trim().is_empty() {
            return Err(ConfigError::Invalid("general.public_url must not be empty".to_string()));
        }

        if self.general.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("general.api_key must not be empty".to_string()));
        }

        if self.general.api_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "general.api_timeout_secs must be positive".to_string(),
            ));
        }

        if self.playout.stream_setting_attempts == 0 {
            return Err(ConfigError::Invalid(
                "playout.stream_setting_attempts must be at least 1".to_string(),
            ));
        }

        if self.playout.script_name.is_empty() {
            return Err(ConfigError::Invalid("playout.script_name must not be empty".to_string()));
        }

        Ok(())
    }
}
