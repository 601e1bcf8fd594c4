//! Engine version detection and control script lookup

use crate::error::{BootstrapError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Liquidsoap expression that prints the version and exits
pub const VERSION_QUERY: &str = "print(liquidsoap.version) shutdown()";

/// Number of leading characters of the version output used as the tag
const VERSION_TAG_LEN: usize = 3;

/// Short `major.minor` tag identifying an installed engine release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeVersion(String);

impl RuntimeVersion {
    /// Build the tag from the engine's version output.
    ///
    /// Only the first three characters are kept, so `"2.1.0-beta"` becomes
    /// `"2.1"`. A two-digit minor (`"2.10.1"`) is still cut to three
    /// characters; a warning is logged since the result is ambiguous.
    pub fn from_output(output: &str) -> Result<Self> {
        let tag: String = output.chars().take(VERSION_TAG_LEN).collect();

        if tag.chars().count() < VERSION_TAG_LEN || tag.chars().any(char::is_whitespace) {
            return Err(BootstrapError::VersionQuery(format!(
                "unexpected version output: {:?}",
                output.trim()
            )));
        }

        if output
            .chars()
            .nth(VERSION_TAG_LEN)
            .is_some_and(|c| c.is_ascii_digit())
        {
            warn!(
                output = output.trim(),
                tag = %tag,
                "Engine version has more than one digit after the major version; using truncated tag"
            );
        }

        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run `engine` in query mode and return its raw stdout
pub fn query_version(engine: &Path) -> Result<String> {
    debug!(engine = %engine.display(), "Querying engine version");

    let output = Command::new(engine)
        .arg(VERSION_QUERY)
        .output()
        .map_err(|e| {
            BootstrapError::VersionQuery(format!("failed to run {}: {}", engine.display(), e))
        })?;

    if !output.status.success() {
        return Err(BootstrapError::VersionQuery(format!(
            "{} exited with {}: {}",
            engine.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Path of the control script for one engine version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLocator(PathBuf);

impl ScriptLocator {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn exists(&self) -> bool {
        self.0.is_file()
    }
}

/// `<base>/<version>/<script_name>`
pub fn resolve_script_path(base: &Path, version: &RuntimeVersion, script_name: &str) -> ScriptLocator {
    ScriptLocator(base.join(version.as_str()).join(script_name))
}
