//! Batch configuration and engine settings.
//!
//! Two layers of configuration feed the engine:
//!
//! - [`BatchConfig`]: the per-invocation request: input folder, output folder,
//!   task, format and optional quality. Built once by the CLI and immutable for
//!   the run. Unknown task/format names and out-of-range quality are rejected
//!   here, before the orchestrator starts.
//! - [`Settings`]: tunable filter parameters and processing options, loaded
//!   from an optional TOML file and merged over stock defaults.
//!
//! ## Settings File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! # width = 800            # Both set = exact size; one set = keep aspect ratio
//! # height = 600           # Neither set = fit inside 128x128
//!
//! [blur]
//! sigma = 2.0              # Gaussian blur strength
//!
//! [processing]
//! parallel = false         # Process files on a worker pool
//! # max_processes = 4      # Worker cap (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{BlurParams, FilterParams, ResizeParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Unknown task '{0}' (expected one of: resize, grayscale, rotate, blur)")]
    UnknownTask(String),
    #[error("Unknown format '{0}' (expected one of: jpeg, webp, png)")]
    UnknownFormat(String),
    #[error("Invalid quality '{0}' (expected a whole number 0-100)")]
    InvalidQuality(String),
    #[error("Quality {0} is out of range (0-100)")]
    QualityOutOfRange(u32),
}

// =============================================================================
// Task and format names
// =============================================================================

/// The image transform requested for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskName {
    Resize,
    Grayscale,
    Rotate,
    Blur,
}

impl TaskName {
    pub const ALL: [TaskName; 4] = [
        TaskName::Resize,
        TaskName::Grayscale,
        TaskName::Rotate,
        TaskName::Blur,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskName::Resize => "resize",
            TaskName::Grayscale => "grayscale",
            TaskName::Rotate => "rotate",
            TaskName::Blur => "blur",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TaskName::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownTask(s.to_string()))
    }
}

/// The output encoding requested for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatName {
    #[default]
    Jpeg,
    Webp,
    Png,
}

impl FormatName {
    pub const ALL: [FormatName; 3] = [FormatName::Jpeg, FormatName::Webp, FormatName::Png];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatName::Jpeg => "jpeg",
            FormatName::Webp => "webp",
            FormatName::Png => "png",
        }
    }

    /// File extension written for this format (`<stem>.<extension>`).
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Whether the quality parameter has any effect for this format.
    pub fn is_lossy(self) -> bool {
        !matches!(self, FormatName::Png)
    }

    /// Quality used when none is requested. `None` for lossless formats.
    pub fn default_quality(self) -> Option<u8> {
        match self {
            FormatName::Jpeg => Some(85),
            FormatName::Webp => Some(80),
            FormatName::Png => None,
        }
    }
}

impl fmt::Display for FormatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(FormatName::Jpeg),
            "webp" => Ok(FormatName::Webp),
            "png" => Ok(FormatName::Png),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Parse a quality argument as given on the command line.
///
/// Only the syntax is checked here; the 0-100 range is enforced by
/// [`BatchConfig::new`].
pub fn parse_quality(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidQuality(raw.to_string()))
}

// =============================================================================
// Batch request
// =============================================================================

/// One invocation's request. Constructed once, immutable for the run.
///
/// Directory preconditions (input exists, output exists and is empty) are
/// checked by [`validate_paths`](crate::validate::validate_paths) when the
/// batch starts, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub task: TaskName,
    pub format: FormatName,
    pub quality: Option<u8>,
}

impl BatchConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        task: TaskName,
        format: FormatName,
        quality: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let quality = match quality {
            Some(q) if q > 100 => return Err(ConfigError::QualityOutOfRange(q)),
            Some(q) => Some(q as u8),
            None => None,
        };
        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            task,
            format,
            quality,
        })
    }
}

// =============================================================================
// Settings file
// =============================================================================

/// Engine settings loaded from an optional TOML file.
///
/// All fields have defaults; a settings file only needs the values it wants
/// to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Target dimensions for the resize task.
    pub resize: ResizeSettings,
    /// Kernel strength for the blur task.
    pub blur: BlurSettings,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlurSettings {
    /// Standard deviation of the Gaussian kernel, in pixels.
    pub sigma: f32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            sigma: BlurParams::default().sigma,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Process files on a worker pool instead of one at a time.
    pub parallel: bool,
    /// Maximum number of parallel workers when `parallel` is on.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl Settings {
    /// Validate settings values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.width == Some(0) || self.resize.height == Some(0) {
            return Err(ConfigError::Validation(
                "resize.width and resize.height must be non-zero".into(),
            ));
        }
        if !self.blur.sigma.is_finite() || self.blur.sigma <= 0.0 {
            return Err(ConfigError::Validation(
                "blur.sigma must be a positive number".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Filter parameters derived from these settings.
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            resize: ResizeParams {
                width: self.resize.width,
                height: self.resize.height,
            },
            blur: BlurParams {
                sigma: self.blur.sigma,
            },
        }
    }
}

/// Resolve the effective worker count.
///
/// - `parallel = false` → 1 (sequential)
/// - `max_processes = None` → all available cores
/// - `max_processes = Some(n)` → `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    if !config.parallel {
        return 1;
    }
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Settings::default())
        .map_err(|e| ConfigError::Validation(format!("default settings must serialize: {e}")))
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_settings(overlay: Option<toml::Value>) -> Result<Settings, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from an explicit TOML file.
///
/// The file must exist: a path given on the command line that cannot be read
/// is a configuration error, not a silent fallback to defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_settings(Some(value))
}

/// Returns a fully-commented stock settings file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_settings_toml() -> &'static str {
    r##"# imgbatch settings
# =================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass the file with `imgbatch run --config settings.toml ...`.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resize task
# ---------------------------------------------------------------------------
[resize]
# Both set: output is exactly width x height (aspect ratio not kept).
# One set:  the other edge follows the source aspect ratio.
# Neither:  the image is fitted inside 128x128, keeping its aspect ratio.
# width = 800
# height = 600

# ---------------------------------------------------------------------------
# Blur task
# ---------------------------------------------------------------------------
[blur]
# Standard deviation of the Gaussian kernel, in pixels.
sigma = 2.0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Process files on a worker pool. The report keeps input order either way.
parallel = false

# Maximum parallel workers when `parallel = true`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
