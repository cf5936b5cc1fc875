//! Configuration file support

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
///
/// ```toml
/// [detection]
/// probability_threshold = 0.7
/// default_language = "und"
///
/// [output]
/// default_format = "json"
/// ```
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Detection configuration
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Detection-related configuration; unset values keep the model's defaults
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct DetectionConfig {
    /// Minimum probability for reporting a language
    pub probability_threshold: Option<f32>,

    /// Answer for unreliable predictions
    pub default_language: Option<String>,
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
        }
    }
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(e.to_string()))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.detection.probability_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(CliError::ConfigError(format!(
                    "probability_threshold must be between 0 and 1, got {threshold}"
                ))
                .into());
            }
        }
        self.output_format()?;
        Ok(())
    }

    /// Parsed default output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.output.default_format.as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::ConfigError(format!("unknown output format '{other}'")).into()),
        }
    }
}
