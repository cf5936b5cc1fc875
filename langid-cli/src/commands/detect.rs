//! Detect command implementation

use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader, TextInput};
use crate::output::{create_formatter, Detection, LanguageScore, OutputFormat};
use anyhow::Result;
use clap::Args;
use langid_core::LanguageClassifier;
use std::io;
use std::path::PathBuf;

/// Arguments for the detect command
#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Model file
    #[arg(short, long, value_name = "FILE", env = "LANGID_MODEL")]
    pub model: PathBuf,

    /// Text to classify (repeatable)
    #[arg(short, long, value_name = "TEXT")]
    pub text: Vec<String>,

    /// Input files or patterns (supports glob); standard input is read when
    /// neither --text nor --input is given
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Classify every non-blank line separately
    #[arg(long)]
    pub lines: bool,

    /// Print the probability of every language
    #[arg(short, long)]
    pub all: bool,

    /// Minimum probability for reporting a language (default: from the model)
    #[arg(long, value_name = "PROBABILITY")]
    pub threshold: Option<f32>,

    /// Answer when no language is reliable enough
    #[arg(short, long, value_name = "CODE")]
    pub default_language: Option<String>,

    /// Output format (default: text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl DetectArgs {
    /// Execute the detect command
    pub fn execute(&self) -> Result<()> {
        super::init_logging(self.verbose, self.quiet);

        log::info!("Starting language detection");
        log::debug!("Arguments: {:?}", self);

        let config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let classifier = self.build_classifier(&config);
        let inputs = self.collect_inputs()?;
        log::info!("Classifying {} input(s)", inputs.len());

        let format = match self.format {
            Some(format) => format,
            None => config.output_format()?,
        };
        let stdout = io::stdout();
        let mut formatter = create_formatter(format, stdout.lock());
        for input in &inputs {
            formatter.format_detection(&self.detect(&classifier, input))?;
        }
        formatter.finish()?;

        Ok(())
    }

    /// Load the model and apply threshold and default language overrides;
    /// command line flags win over the configuration file
    fn build_classifier(&self, config: &CliConfig) -> LanguageClassifier {
        let mut classifier = LanguageClassifier::from_path(&self.model);
        if !classifier.is_valid() {
            log::warn!(
                "Model {} could not be loaded, every answer will be the default language",
                self.model.display()
            );
        }

        if let Some(threshold) = self.threshold.or(config.detection.probability_threshold) {
            classifier.set_probability_threshold(threshold);
        }
        if let Some(code) = self
            .default_language
            .as_ref()
            .or(config.detection.default_language.as_ref())
        {
            classifier.set_default_language(code.clone());
        }
        classifier
    }

    /// Gather texts from arguments, files and standard input
    fn collect_inputs(&self) -> Result<Vec<TextInput>> {
        let mut inputs: Vec<TextInput> = self
            .text
            .iter()
            .enumerate()
            .map(|(index, text)| TextInput::new(format!("text:{}", index + 1), text.clone()))
            .collect();

        if !self.input.is_empty() {
            for path in resolve_patterns(&self.input)? {
                log::debug!("Reading {}", path.display());
                let text = FileReader::read_text(&path)?;
                inputs.push(TextInput::new(path.display().to_string(), text));
            }
        }

        if self.text.is_empty() && self.input.is_empty() {
            inputs.push(TextInput::new("stdin", FileReader::read_stdin()?));
        }

        if self.lines {
            inputs = inputs.iter().flat_map(TextInput::split_lines).collect();
        }
        Ok(inputs)
    }

    fn detect(&self, classifier: &LanguageClassifier, input: &TextInput) -> Detection {
        let scores = self.all.then(|| {
            classifier
                .find_languages(&input.text)
                .into_iter()
                .map(|(language, probability)| LanguageScore {
                    language,
                    probability,
                })
                .collect()
        });
        Detection {
            source: input.source.clone(),
            language: classifier.find_language(&input.text),
            scores,
        }
    }
}
