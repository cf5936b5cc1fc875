//! Output formatting module

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per input
    Text,
    /// JSON array of detections
    Json,
}

/// Probability of one language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageScore {
    /// Language code
    pub language: String,
    /// Softmax probability
    pub probability: f32,
}

/// Result of classifying one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Where the text came from: a file, a file line or a command line argument
    pub source: String,
    /// Best language, or the default language
    pub language: String,
    /// Every language with its probability, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<LanguageScore>>,
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and output a single detection
    fn format_detection(&mut self, detection: &Detection) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Create the formatter for `format`
pub fn create_formatter<'w, W: Write + 'w>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputFormatter + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
    }
}
