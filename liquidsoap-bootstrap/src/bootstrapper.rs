//! Engine bootstrap: version detection, script selection and process replacement

use crate::error::{BootstrapError, Result};
use crate::generator::ConfigGenerator;
use crate::version::{query_version, resolve_script_path, RuntimeVersion, ScriptLocator};
use playout_config::PlayoutConfig;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Everything needed to locate and start the engine
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Engine binary
    pub engine_bin: PathBuf,
    /// `argv[0]` for the engine process
    pub program_name: String,
    /// Sandbox directory exported as `HOME`
    pub home_dir: PathBuf,
    /// Directory holding one sub-directory per engine version
    pub script_dir: PathBuf,
    /// Control script file name
    pub script_name: String,
}

impl BootstrapSettings {
    /// Build settings from the config, defaulting the script directory to
    /// the directory of the running executable
    pub fn from_config(config: &PlayoutConfig) -> Result<Self> {
        let script_dir = match &config.script_dir {
            Some(dir) => dir.clone(),
            None => install_dir()?,
        };

        Ok(Self {
            engine_bin: config.liquidsoap_bin.clone(),
            program_name: config.program_name.clone(),
            home_dir: config.home_dir.clone(),
            script_dir,
            script_name: config.script_name.clone(),
        })
    }
}

fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| BootstrapError::Io(format!("cannot locate running executable: {e}")))?;

    exe.parent()
        .map(|dir| dir.to_path_buf())
        .ok_or_else(|| BootstrapError::Io(format!("{} has no parent directory", exe.display())))
}

/// Starts the engine with the control script matching its version
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    settings: BootstrapSettings,
}

impl Bootstrapper {
    pub fn new(settings: BootstrapSettings) -> Self {
        Self { settings }
    }

    /// Point `HOME` at the sandbox so the engine's state stays contained
    pub fn prepare_environment(&self) {
        debug!(home = %self.settings.home_dir.display(), "Setting HOME for the engine");
        std::env::set_var("HOME", &self.settings.home_dir);
    }

    /// Ask the engine binary for its version
    pub fn resolve_version(&self) -> Result<RuntimeVersion> {
        let output = query_version(&self.settings.engine_bin)?;
        RuntimeVersion::from_output(&output)
    }

    /// Resolve the control script for `version` and check that it exists
    pub fn locate_script(&self, version: &RuntimeVersion) -> Result<ScriptLocator> {
        let script = resolve_script_path(&self.settings.script_dir, version, &self.settings.script_name);

        if !script.exists() {
            return Err(BootstrapError::ScriptNotFound(script.path().to_path_buf()));
        }

        Ok(script)
    }

    /// Replace the current process with the engine running `script`.
    ///
    /// Only returns on failure; on success this process image is gone.
    pub fn launch(&self, script: &ScriptLocator, debug: bool) -> Result<Infallible> {
        let mut command = self.engine_command(script, debug);

        let debug_mode = debug;
        info!(
            engine = %self.settings.engine_bin.display(),
            script = %script.path().display(),
            debug_mode,
            "Launching engine"
        );

        replace_process(&mut command).map_err(|source| BootstrapError::Launch {
            binary: self.settings.engine_bin.clone(),
            source,
        })
    }

    /// Run the full sequence: environment, config generation, version
    /// query, script lookup, exec
    pub fn run<G>(&self, generator: &G, debug: bool) -> Result<Infallible>
    where
        G: ConfigGenerator + ?Sized,
    {
        self.prepare_environment();

        let config_path = generator.generate()?;
        debug!(path = %config_path.display(), "Engine config ready");

        let version = self.resolve_version()?;
        let script = self.locate_script(&version)?;

        if debug {
            info!("Liquidsoap {} using script: {}", version, script.path().display());
        }

        self.launch(&script, debug)
    }

    fn engine_command(&self, script: &ScriptLocator, debug: bool) -> Command {
        let mut command = Command::new(&self.settings.engine_bin);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(&self.settings.program_name);
        }

        command
            .env("HOME", &self.settings.home_dir)
            .arg("--verbose")
            .arg(script.path());

        if debug {
            command.arg("--debug");
        }

        command
    }
}

#[cfg(unix)]
fn replace_process(command: &mut Command) -> std::io::Result<Infallible> {
    use std::os::unix::process::CommandExt;
    Err(command.exec())
}

// Without exec, run the engine as a child and mirror its exit status.
#[cfg(not(unix))]
fn replace_process(command: &mut Command) -> std::io::Result<Infallible> {
    let status = command.status()?;
    std::process::exit(status.code().unwrap_or(1))
}
