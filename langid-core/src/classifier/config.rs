//! Per-instance query settings

/// Default configuration constants
pub mod defaults {
    /// Probability threshold used until a model provides its own
    pub const PROBABILITY_THRESHOLD: f32 = 0.5;

    /// Answer returned when no language is reliable enough
    pub const DEFAULT_LANGUAGE: &str = "";
}

/// Mutable settings of a [`super::LanguageClassifier`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Minimum probability of the best language for it to be reported
    pub probability_threshold: f32,
    /// Returned instead of an unreliable or unavailable prediction
    pub default_language: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            probability_threshold: defaults::PROBABILITY_THRESHOLD,
            default_language: defaults::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Set the probability threshold
    pub fn with_probability_threshold(mut self, threshold: f32) -> Self {
        self.probability_threshold = threshold;
        self
    }

    /// Set the default language
    pub fn with_default_language(mut self, code: impl Into<String>) -> Self {
        self.default_language = code.into();
        self
    }
}
