//! Engine config generation
//!
//! Before the engine starts, the stream output settings stored on the
//! scheduling server are rendered into a Liquidsoap config file that the
//! control script includes.

use crate::error::{BootstrapError, Result};
use api_client::StreamSettingProvider;
use playout_config::PlayoutConfig;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Something that prepares the engine's configuration before launch
pub trait ConfigGenerator {
    /// Write the configuration and return where it was written
    fn generate(&self) -> Result<PathBuf>;
}

/// Output location and fetch policy for [`StreamSettingsGenerator`]
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub output_path: PathBuf,
    pub log_file: PathBuf,
    pub attempts: u32,
    pub retry_delay: Duration,
}

impl From<&PlayoutConfig> for GeneratorSettings {
    fn from(config: &PlayoutConfig) -> Self {
        Self {
            output_path: config.liquidsoap_cfg_path.clone(),
            log_file: config.liquidsoap_log_file.clone(),
            attempts: config.stream_setting_attempts.max(1),
            retry_delay: Duration::from_secs(config.stream_setting_retry_delay_secs),
        }
    }
}

/// Renders the server's stream settings into `liquidsoap.cfg`
#[derive(Debug)]
pub struct StreamSettingsGenerator<P> {
    provider: P,
    settings: GeneratorSettings,
}

impl<P: StreamSettingProvider> StreamSettingsGenerator<P> {
    pub fn new(provider: P, settings: GeneratorSettings) -> Self {
        Self { provider, settings }
    }

    fn fetch_settings(&self) -> Result<Map<String, Value>> {
        let mut attempt = 1;
        loop {
            match self.provider.get_stream_setting() {
                Ok(settings) => return Ok(settings),
                Err(e) if attempt < self.settings.attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.settings.attempts,
                        error = %e,
                        "Couldn't fetch stream settings from the server, retrying"
                    );
                    attempt += 1;
                    thread::sleep(self.settings.retry_delay);
                }
                Err(e) => {
                    return Err(BootstrapError::ConfigGeneration(format!(
                        "unable to fetch stream settings after {attempt} attempt(s): {e}"
                    )));
                }
            }
        }
    }
}

impl<P: StreamSettingProvider> ConfigGenerator for StreamSettingsGenerator<P> {
    fn generate(&self) -> Result<PathBuf> {
        let settings = self.fetch_settings()?;
        let content = render_config(&settings, &self.settings.log_file);

        std::fs::write(&self.settings.output_path, content).map_err(|e| {
            BootstrapError::ConfigGeneration(format!(
                "failed to write {}: {}",
                self.settings.output_path.display(),
                e
            ))
        })?;

        info!(
            path = %self.settings.output_path.display(),
            settings = settings.len(),
            "Generated engine config"
        );
        Ok(self.settings.output_path.clone())
    }
}

/// Render stream settings as Liquidsoap assignments.
///
/// Every assignment is followed by `ignore(<key>)` so the engine does not
/// warn about settings the control script never reads.
pub fn render_config(settings: &Map<String, Value>, log_file: &Path) -> String {
    let mut out = String::new();
    out.push_str("################################################\n");
    out.push_str("# THIS FILE IS AUTO GENERATED. DO NOT CHANGE!! #\n");
    out.push_str("################################################\n");
    out.push_str("# The ignore() lines are to squash unused variable warnings\n");

    for (key, value) in settings {
        out.push_str(&format!("{} = {}\n", key, render_value(key, value)));
        out.push_str(&format!("ignore({})\n", key));
    }

    out.push_str(&format!("log_file = {}\n", quote(&log_file.to_string_lossy())));
    out
}

fn render_value(key: &str, value: &Value) -> String {
    let numeric_key = key.contains("port") || key.contains("bitrate");

    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if numeric_key && n.is_i64() => n.to_string(),
        Value::String(s) if numeric_key && s.trim().parse::<i64>().is_ok() => s.trim().to_string(),
        Value::String(s) if s == "true" || s == "false" => s.clone(),
        Value::String(s) => quote(s),
        Value::Null => quote(""),
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::ApiError;
    use serde_json::json;
    use std::cell::Cell;

    struct FlakyProvider {
        failures_left: Cell<u32>,
        calls: Cell<u32>,
        settings: Map<String, Value>,
    }

    impl FlakyProvider {
        fn new(failures: u32) -> Self {
            let settings = match json!({"s1_port": "8000", "s1_host": "localhost"}) {
                Value::Object(map) => map,
                _ => unreachable!(),
            };
            Self {
                failures_left: Cell::new(failures),
                calls: Cell::new(0),
                settings,
            }
        }
    }

    impl StreamSettingProvider for FlakyProvider {
        fn get_stream_setting(&self) -> api_client::Result<Map<String, Value>> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(ApiError::Network("connection refused".to_string()));
            }
            Ok(self.settings.clone())
        }
    }

    fn settings_in(dir: &Path, attempts: u32) -> GeneratorSettings {
        GeneratorSettings {
            output_path: dir.join("liquidsoap.cfg"),
            log_file: PathBuf::from("/var/log/playout/ls_script.log"),
            attempts,
            retry_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_render_value_types() {
        assert_eq!(render_value("s1_port", &json!("8000")), "8000");
        assert_eq!(render_value("s1_bitrate", &json!(128)), "128");
        assert_eq!(render_value("s1_enable", &json!("true")), "true");
        assert_eq!(render_value("s1_enable", &json!(false)), "false");
        assert_eq!(render_value("s1_host", &json!("icecast.local")), "\"icecast.local\"");
        assert_eq!(render_value("s1_port", &json!("not-a-port")), "\"not-a-port\"");
        assert_eq!(render_value("s1_name", &json!("Say \"hi\"")), "\"Say \\\"hi\\\"\"");
        assert_eq!(render_value("s1_mount", &Value::Null), "\"\"");
    }

    #[test]
    fn test_render_config_layout() {
        let settings = match json!({"s1_port": "8000", "s1_enable": "true"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let rendered = render_config(&settings, Path::new("/var/log/ls.log"));

        assert!(rendered.starts_with("################################################\n"));
        assert!(rendered.contains("s1_enable = true\nignore(s1_enable)\n"));
        assert!(rendered.contains("s1_port = 8000\nignore(s1_port)\n"));
        assert!(rendered.ends_with("log_file = \"/var/log/ls.log\"\n"));
    }

    #[test]
    fn test_generate_writes_file_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FlakyProvider::new(2);
        let generator = StreamSettingsGenerator::new(provider, settings_in(dir.path(), 3));

        let path = generator.generate().unwrap();

        assert_eq!(path, dir.path().join("liquidsoap.cfg"));
        assert_eq!(generator.provider.calls.get(), 3);
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("s1_host = \"localhost\""));
    }

    #[test]
    fn test_generate_gives_up_after_max_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FlakyProvider::new(5);
        let generator = StreamSettingsGenerator::new(provider, settings_in(dir.path(), 2));

        let result = generator.generate();

        assert!(matches!(result, Err(BootstrapError::ConfigGeneration(_))));
        assert_eq!(generator.provider.calls.get(), 2);
        assert!(!dir.path().join("liquidsoap.cfg").exists());
    }
}
