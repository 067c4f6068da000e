//! Capture configuration loaded from TOML.
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::logging::Severity;

/// Environment variable naming the config file read by
/// [`CaptureConfig::discover`].
pub const CONFIG_ENV: &str = "LOGCHECK_CONFIG";

/// Settings for a [`CaptureSession`](crate::session::CaptureSession).
///
/// ```toml
/// replay_on_failure = true
/// report_failure = true
/// capture_tracing = true
/// level = "debug"
/// replay_tag = "test"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Replay captured entries into the original logger when a test fails.
    pub replay_on_failure: bool,
    /// Write the failure description and trace to the diagnostic stream.
    pub report_failure: bool,
    /// Also capture events emitted through `tracing` macros.
    pub capture_tracing: bool,
    /// Minimum severity captured.
    pub level: Severity,
    /// Attribute key under which replayed entries carry the test identity.
    pub replay_tag: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            replay_on_failure: true,
            report_failure: true,
            capture_tracing: true,
            level: Severity::Debug,
            replay_tag: "test".to_string(),
        }
    }
}

impl CaptureConfig {
    /// Load settings from a TOML file; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or contains
    /// unknown keys.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read capture config: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse capture config: {}", path.display()))
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this struct.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the file named by `LOGCHECK_CONFIG`, or the
    /// defaults when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file cannot be read or parsed.
    pub fn discover() -> Result<Self> {
        std::env::var_os(CONFIG_ENV)
            .map_or_else(|| Ok(Self::default()), |path| Self::load(Path::new(&path)))
    }
}
