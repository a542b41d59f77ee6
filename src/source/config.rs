//! Run configuration.
//!
//! Every section is optional in the TOML file; missing values fall back
//! to the defaults below, which reproduce the classic single-directory run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where frames are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the frames.
    pub path: PathBuf,
    /// Glob pattern matched inside `path`.
    pub pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("images"),
            pattern: "*.png".to_owned(),
        }
    }
}

impl InputConfig {
    /// Validates the input parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(self.pattern.clone()));
        }
        glob::Pattern::new(&self.pattern)
            .map_err(|_| ConfigError::InvalidPattern(self.pattern.clone()))?;
        Ok(())
    }
}

/// Shape of the weighting curve applied to popularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Mean of the normal curve.
    pub curve_mean: f64,
    /// Standard deviation of the normal curve.
    pub curve_std_dev: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            curve_mean: 0.5,
            curve_std_dev: 3.0,
        }
    }
}

impl RenderConfig {
    /// Validates the curve parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.curve_mean.is_finite()
            || !self.curve_std_dev.is_finite()
            || self.curve_std_dev <= 0.0
        {
            return Err(ConfigError::InvalidCurve {
                mean: self.curve_mean,
                std_dev: self.curve_std_dev,
            });
        }
        Ok(())
    }
}

/// Output destinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Heatmap image path.
    pub changes: PathBuf,
    /// Never-changed mask image path.
    pub unchanged: PathBuf,
    /// Optional TOML run report.
    pub report: Option<PathBuf>,
    /// Optional Prometheus text dump.
    pub metrics: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            changes: PathBuf::from("changes.png"),
            unchanged: PathBuf::from("unchanged.png"),
            report: None,
            metrics: None,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame pattern: {0:?}")]
    InvalidPattern(String),
    #[error("invalid weighting curve (mean {mean}, std dev {std_dev})")]
    InvalidCurve { mean: f64, std_dev: f64 },
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input.validate()?;
        self.render.validate()
    }
}
