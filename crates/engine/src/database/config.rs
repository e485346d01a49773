//! Read-path configuration via `vellum.toml`
//!
//! A default `vellum.toml` can be written next to the application's data
//! and edited by hand; an unknown direction or a zero batch size is
//! rejected when the file is loaded.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vellum_core::{Direction, HistoryOptions, VellumError, VellumResult};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "vellum.toml";

/// Read-path configuration loaded from `vellum.toml`.
///
/// # Example
///
/// ```toml
/// cursor_batch_size = 128
/// default_direction = "ascending"
/// history_with_docs = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VellumConfig {
    /// Items fetched per cursor batch (revisions, documents, rows).
    #[serde(default = "default_cursor_batch_size")]
    pub cursor_batch_size: usize,
    /// Direction used by default history options: `"ascending"` or `"descending"`.
    #[serde(default)]
    pub default_direction: Direction,
    /// Whether default history options include documents.
    #[serde(default)]
    pub history_with_docs: bool,
}

fn default_cursor_batch_size() -> usize {
    128
}

impl Default for VellumConfig {
    fn default() -> Self {
        Self {
            cursor_batch_size: default_cursor_batch_size(),
            default_direction: Direction::Ascending,
            history_with_docs: false,
        }
    }
}

impl VellumConfig {
    /// Check every field.
    pub fn validate(&self) -> VellumResult<()> {
        if self.cursor_batch_size == 0 {
            return Err(VellumError::config(format!(
                "cursor_batch_size in {} must be at least 1",
                CONFIG_FILE_NAME
            )));
        }
        Ok(())
    }

    /// History options seeded from this config.
    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions::new()
            .direction(self.default_direction)
            .with_docs(self.history_with_docs)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Vellum read-path configuration
#
# Number of revisions, documents or rows fetched per cursor batch
cursor_batch_size = 128

# Direction used when a caller asks for default history options:
#   "ascending"  = oldest valid time first
#   "descending" = newest valid time first
default_direction = "ascending"

# Include documents in history entries by default (default: false)
history_with_docs = false
"#
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> VellumResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VellumError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: VellumConfig = toml::from_str(&content).map_err(|e| {
            VellumError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> VellumResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                VellumError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> VellumResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VellumError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            VellumError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
