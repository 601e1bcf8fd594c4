//! Liquidsoap bootstrap
//!
//! Detects which Liquidsoap release is installed, generates the engine
//! config from the scheduling server's stream settings, picks the control
//! script written for that release, and replaces the current process with
//! the engine.
//!
//! ```no_run
//! use liquidsoap_bootstrap::{BootstrapSettings, Bootstrapper};
//! use playout_config::PlayoutConfig;
//!
//! let settings = BootstrapSettings::from_config(&PlayoutConfig::default())?;
//! let bootstrapper = Bootstrapper::new(settings);
//! let version = bootstrapper.resolve_version()?;
//! let script = bootstrapper.locate_script(&version)?;
//! println!("would run {}", script.path().display());
//! # Ok::<(), liquidsoap_bootstrap::BootstrapError>(())
//! ```

mod bootstrapper;
mod error;
pub mod generator;
pub mod version;

pub use bootstrapper::{BootstrapSettings, Bootstrapper};
pub use error::{BootstrapError, Result};
pub use generator::{ConfigGenerator, GeneratorSettings, StreamSettingsGenerator};
pub use version::{resolve_script_path, RuntimeVersion, ScriptLocator};
