//! Language classifier
//!
//! Wires the model's tokenizer, feature domains and network together and
//! turns probabilities into an answer. Construction never fails: a model
//! that cannot be read or validated is logged once and leaves the
//! classifier invalid, in which case every query yields the default
//! language or no scores at all.

mod config;


pub use config::{defaults, ClassifierConfig};

use crate::model::{LanguageModel, ModelBytes};
use crate::softmax::arg_max;
use std::fs::File;
use std::path::Path;

/// Predicts the language of short texts
///
/// Queries take `&self` and may run concurrently once construction has
/// returned. The setters take `&mut self`, so changing the configuration
/// while queries are in flight requires external synchronization.
#[derive(Debug, Clone)]
pub struct LanguageClassifier {
    model: Option<LanguageModel>,
    config: ClassifierConfig,
}

impl LanguageClassifier {
    /// Load the model file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ModelBytes::open(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) => {
                tracing::error!("unable to open model file {}: {e}", path.display());
                Self::invalid()
            }
        }
    }

    /// Load the model from an open file
    pub fn from_file(file: &File) -> Self {
        match ModelBytes::from_file(file) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) => {
                tracing::error!("unable to map model file: {e}");
                Self::invalid()
            }
        }
    }

    /// Load the model from bytes in memory
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match LanguageModel::load(bytes) {
            Ok(model) => Self::with_model(model),
            Err(e) => {
                tracing::error!("invalid language identification model: {e}");
                Self::invalid()
            }
        }
    }

    /// Wrap an already loaded model; its reliability threshold becomes the
    /// probability threshold
    pub fn with_model(model: LanguageModel) -> Self {
        let config = ClassifierConfig::default()
            .with_probability_threshold(model.reliability_threshold());
        Self {
            model: Some(model),
            config,
        }
    }

    fn invalid() -> Self {
        Self {
            model: None,
            config: ClassifierConfig::default(),
        }
    }

    /// Whether a model was loaded
    pub fn is_valid(&self) -> bool {
        self.model.is_some()
    }

    /// Loaded model, if any
    pub fn model(&self) -> Option<&LanguageModel> {
        self.model.as_ref()
    }

    /// Current settings
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Known language codes; empty when invalid
    pub fn languages(&self) -> &[String] {
        match &self.model {
            Some(model) => model.languages(),
            None => &[],
        }
    }

    /// Minimum probability for [`LanguageClassifier::find_language`] to
    /// report a language
    pub fn set_probability_threshold(&mut self, threshold: f32) {
        self.config.probability_threshold = threshold;
    }

    /// Answer returned when no language is reliable enough
    pub fn set_default_language(&mut self, code: impl Into<String>) {
        self.config.default_language = code.into();
    }

    /// Probability of every known language, in [`Self::languages`] order
    ///
    /// Empty when the classifier is invalid.
    pub fn score_languages(&self, text: &str) -> Vec<f32> {
        self.model
            .as_ref()
            .map_or_else(Vec::new, |model| model.score(text))
    }

    /// Most probable language, or the default language when there are no
    /// scores or the best probability is below the threshold
    pub fn find_language(&self, text: &str) -> String {
        let scores = self.score_languages(text);
        let Some(best) = arg_max(&scores) else {
            return self.config.default_language.clone();
        };
        if scores[best] < self.config.probability_threshold {
            return self.config.default_language.clone();
        }
        match self.languages().get(best) {
            Some(code) => code.clone(),
            None => {
                tracing::warn!("no language for network output {best}");
                self.config.default_language.clone()
            }
        }
    }

    /// Every known language with its probability, in [`Self::languages`]
    /// order; not filtered by the threshold
    pub fn find_languages(&self, text: &str) -> Vec<(String, f32)> {
        let scores = self.score_languages(text);
        self.languages()
            .iter()
            .cloned()
            .zip(scores)
            .collect()
    }
}
