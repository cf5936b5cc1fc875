//! Resolved configuration stored inside a model container
//!
//! The task spec is a TOML document:
//!
//! ```toml
//! [parameters]
//! reliability_thresh = 0.5
//!
//! [[inputs]]
//! name = "language-identifier-network"
//! parts = ["network.bin"]
//!
//! [tokenizer]
//! lowercase = true
//!
//! [[features]]
//! name = "chargrams"
//! kind = "chargrams"
//! num_buckets = 1000
//! ```

use crate::features::FeatureDomainSpec;
use crate::tokenizer::TokenizerOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// String value
    Text(String),
}

/// A named input made of one or more files in the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    /// Input name, such as `language-identifier-network`
    pub name: String,
    /// Names of the container files holding the input
    #[serde(default)]
    pub parts: Vec<String>,
}

/// Model configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Key/value options
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
    /// Named inputs
    #[serde(default)]
    pub inputs: Vec<TaskInput>,
    /// Tokenizer options
    #[serde(default)]
    pub tokenizer: TokenizerOptions,
    /// Feature domains, one per embedding table
    #[serde(default)]
    pub features: Vec<FeatureDomainSpec>,
}

impl TaskSpec {
    /// Parse a task spec from TOML
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serialize the task spec to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Set a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: ParameterValue) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Declare a single-part input
    pub fn with_input(mut self, name: impl Into<String>, file: impl Into<String>) -> Self {
        self.inputs.push(TaskInput {
            name: name.into(),
            parts: vec![file.into()],
        });
        self
    }

    /// Add a feature domain
    pub fn with_feature(mut self, feature: FeatureDomainSpec) -> Self {
        self.features.push(feature);
        self
    }

    /// Numeric parameter; integers are widened
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.parameters.get(key)? {
            ParameterValue::Float(value) => Some(*value),
            ParameterValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// String parameter
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.parameters.get(key)? {
            ParameterValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Boolean parameter
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.parameters.get(key)? {
            ParameterValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Look up a named input
    pub fn input(&self, name: &str) -> Option<&TaskInput> {
        self.inputs.iter().find(|input| input.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_of_every_type() {
        let spec = TaskSpec::from_toml(
            r#"
            [parameters]
            reliability_thresh = 0.7
            max_tokens = 3
            verbose = true
            model_name = "small"
            "#,
        )
        .unwrap();

        assert_eq!(spec.get_float("reliability_thresh"), Some(0.7));
        assert_eq!(spec.get_float("max_tokens"), Some(3.0));
        assert_eq!(spec.get_bool("verbose"), Some(true));
        assert_eq!(spec.get_str("model_name"), Some("small"));
        assert_eq!(spec.get_float("model_name"), None);
        assert_eq!(spec.get_float("missing"), None);
    }

    #[test]
    fn test_empty_spec_uses_defaults() {
        let spec = TaskSpec::from_toml("").unwrap();
        assert!(spec.parameters.is_empty());
        assert!(spec.inputs.is_empty());
        assert_eq!(spec.tokenizer, TokenizerOptions::default());
        assert!(spec.features.is_empty());
    }

    #[test]
    fn test_inputs() {
        let spec = TaskSpec::from_toml(
            r#"
            [[inputs]]
            name = "language-name-id-map"
            parts = ["languages.bin"]

            [[inputs]]
            name = "split"
            parts = ["a.bin", "b.bin"]
            "#,
        )
        .unwrap();

        let input = spec.input("language-name-id-map").unwrap();
        assert_eq!(input.parts, vec!["languages.bin"]);
        assert_eq!(spec.input("split").unwrap().parts.len(), 2);
        assert!(spec.input("absent").is_none());
    }

    #[test]
    fn test_builder_round_trip() {
        let spec = TaskSpec::default()
            .with_parameter("reliability_thresh", ParameterValue::Float(0.25))
            .with_input("language-identifier-network", "network.bin")
            .with_feature(FeatureDomainSpec::relevant_script("script"));
        let text = spec.to_toml().unwrap();
        assert_eq!(TaskSpec::from_toml(&text).unwrap(), spec);
    }

    #[test]
    fn test_malformed_toml() {
        assert!(TaskSpec::from_toml("[parameters\nx = 1").is_err());
        assert!(TaskSpec::from_toml("inputs = 3").is_err());
    }
}
