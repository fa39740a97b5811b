//! Conditioner configuration module.
//!
//! Handles loading, validating, and merging `conditioner.toml`. User values
//! are merged on top of stock defaults, so a config file only needs the keys
//! it wants to change.
//!
//! ## Config File Location
//!
//! `conditioner.toml` in the working directory is picked up when present.
//! `--config <FILE>` points somewhere else; an explicitly named file must
//! exist.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! target_subdir = "New"     # Default target directory, under the source directory
//! same_dir_suffix = "new"   # x.png -> x.new.png when writing next to the source
//! jpeg_quality = 90         # JPEG encoding quality (1-100)
//!
//! [scan]
//! extensions = ["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, supported_input_extensions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "conditioner.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Conditioner configuration loaded from `conditioner.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConditionerConfig {
    /// Where and how conditioned images are written.
    pub output: OutputConfig,
    /// Which files of a source directory are conditioned.
    pub scan: ScanConfig,
}

impl ConditionerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = &self.output;
        if output.target_subdir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.target_subdir must not be empty".into(),
            ));
        }
        if output.same_dir_suffix.is_empty()
            || output.same_dir_suffix.contains(['/', '\\', '.'])
        {
            return Err(ConfigError::Validation(
                "output.same_dir_suffix must be a non-empty name without dots or separators"
                    .into(),
            ));
        }
        if !(1..=100).contains(&output.jpeg_quality) {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.extensions must not be empty".into(),
            ));
        }
        if self.scan.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "scan.extensions must not contain empty entries".into(),
            ));
        }
        Ok(())
    }

    /// Default target directory for images taken from `source_dir`.
    pub fn default_target_dir(&self, source_dir: &Path) -> PathBuf {
        source_dir.join(&self.output.target_subdir)
    }

    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.output.jpeg_quality)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub target_subdir: String,
    pub same_dir_suffix: String,
    pub jpeg_quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            target_subdir: "New".to_string(),
            same_dir_suffix: crate::condition::DEFAULT_SAME_DIR_SUFFIX.to_string(),
            jpeg_quality: Quality::default().value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// File extensions, without the dot. Matched case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: supported_input_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ConditionerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value, `None` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ConditionerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ConditionerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration.
///
/// With `Some(path)` the file must exist. With `None`, [`DEFAULT_CONFIG_FILE`]
/// in the working directory is used when present and stock defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ConditionerConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(
            load_raw_config(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?,
        ),
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `conditioner.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Conditioner Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Target directory used when `run` gets no --target, relative to the
# source directory.
target_subdir = "New"

# When the target directory is the source directory, this suffix is put
# before the extension so the original is never touched: x.png -> x.new.png
same_dir_suffix = "new"

# JPEG encoding quality (1 = worst, 100 = best).
jpeg_quality = 90

# ---------------------------------------------------------------------------
# Source scanning
# ---------------------------------------------------------------------------
[scan]
# Extensions (case-insensitive, no dot) of the files picked up from the
# source directory. Subdirectories are not entered.
extensions = ["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff"]
"##
}
