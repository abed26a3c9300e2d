//! Application configuration module.
//!
//! Handles loading, validating, and merging `photo-filter.toml`. Stock
//! defaults are the base layer; a user file only needs the keys it wants to
//! override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [preview]
//! width = 375.0             # Viewport width in points
//! height = 500.0            # Viewport height in points
//! pixel_density = 2.0       # Physical pixels per point (>= 1)
//!
//! [filter]
//! brightness = 0.0          # Additive offset, typically -1..1
//! contrast = 1.0            # Gain around mid-gray, typically 0..4
//! saturation = 1.0          # 0 = grayscale, 1 = unchanged
//! blur_radius = 0.0         # Gaussian sigma in pixels, 0 = off
//!
//! [library]
//! directory = "Photos"      # Where saved photos go
//! format = "jpg"            # jpg | jpeg | png
//! quality = 90              # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Filter values are not validated: they are passed to the filter chain as
//! is, and the chain falls back to the unfiltered image if it cannot render
//! them. Unknown keys are rejected to catch typos early.

use crate::imaging::{FilterParameters, TargetSize};
use crate::storage::{LibraryFormat, LibraryStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "photo-filter.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `photo-filter.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Preview viewport.
    pub preview: PreviewConfig,
    /// Starting filter parameters.
    pub filter: FilterParameters,
    /// Photo library destination.
    pub library: LibraryConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.preview;
        if !(p.width.is_finite() && p.width > 0.0 && p.height.is_finite() && p.height > 0.0) {
            return Err(ConfigError::Validation(
                "preview.width and preview.height must be positive".into(),
            ));
        }
        if !(p.pixel_density.is_finite() && p.pixel_density >= 1.0) {
            return Err(ConfigError::Validation(
                "preview.pixel_density must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.library.quality) {
            return Err(ConfigError::Validation(
                "library.quality must be 1-100".into(),
            ));
        }
        self.library.format()?;
        Ok(())
    }
}

/// Preview viewport in points plus the display's pixel density.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub width: f32,
    pub height: f32,
    pub pixel_density: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 500.0,
            pixel_density: 2.0,
        }
    }
}

impl PreviewConfig {
    pub fn target_size(&self) -> TargetSize {
        TargetSize::new(self.width, self.height, self.pixel_density)
    }
}

/// Photo library settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Library directory. Created on first save.
    pub directory: PathBuf,
    /// Output encoding: `jpg`, `jpeg` or `png`.
    pub format: String,
    /// JPEG quality (1 = worst, 100 = best). Ignored for PNG.
    pub quality: u8,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Photos"),
            format: "jpg".to_string(),
            quality: 90,
        }
    }
}

impl LibraryConfig {
    pub fn format(&self) -> Result<LibraryFormat, ConfigError> {
        LibraryFormat::parse(&self.format, self.quality)
            .map_err(|e| ConfigError::Validation(format!("library.format: {}", e)))
    }

    pub fn store(&self) -> Result<LibraryStore, ConfigError> {
        Ok(LibraryStore::new(&self.directory, self.format()?))
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel filter workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `photo-filter.toml` from the given directory.
///
/// A missing file yields the stock defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME), false)
}

/// Load a specific config file.
///
/// With `required`, a missing file is an error instead of falling back to
/// defaults (used for an explicit `--config`).
pub fn load_config_file(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if required && overlay.is_none() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file {} not found", path.display()),
        )));
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `photo-filter.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-filter configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Preview viewport
# ---------------------------------------------------------------------------
[preview]
# Viewport size in points. The preview is rendered at
# round(width * pixel_density) x round(height * pixel_density) pixels,
# stretched to fill the box exactly.
width = 375.0
height = 500.0

# Physical pixels per point (1 = standard display, 2-3 = high density).
pixel_density = 2.0

# ---------------------------------------------------------------------------
# Starting filter values (command-line flags override these)
# ---------------------------------------------------------------------------
[filter]
# Additive brightness offset, typically -1.0 to 1.0.
brightness = 0.0

# Contrast gain around mid-gray, typically 0.0 to 4.0. 1.0 = unchanged.
contrast = 1.0

# 0.0 = grayscale, 1.0 = unchanged, above 1.0 = oversaturated.
saturation = 1.0

# Gaussian blur sigma in pixels, up to 1000. 0.0 = no blur.
# Larger values leave the photo unfiltered.
blur_radius = 0.0

# ---------------------------------------------------------------------------
# Photo library
# ---------------------------------------------------------------------------
[library]
# Directory saved photos are written to (created on first save).
directory = "Photos"

# Encoding for saved photos: "jpg", "jpeg" or "png".
format = "jpg"

# JPEG quality (1 = worst, 100 = best). Ignored for PNG.
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel filter workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
