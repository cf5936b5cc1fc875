//! Small hand-built models for unit tests

use super::{
    write_language_map, Activation, Combiner, EmbeddingTable, Layer, ModelContainerBuilder,
    NetworkParams, ParameterValue, TaskSpec, LANGUAGE_MAP_INPUT, NETWORK_INPUT,
    RELIABILITY_THRESHOLD_PARAM,
};
use crate::features::{FeatureDomainSpec, FeatureExtractionOptions};
use crate::unicode::Script;
use ndarray::{Array1, Array2};

pub(crate) const CHARGRAM_TABLE: &str = "chargrams";
pub(crate) const CHARGRAM_BUCKETS: usize = 16;

const NETWORK_FILE: &str = "network.bin";
const LANGUAGES_FILE: &str = "languages.bin";

/// Editable pieces of a model, serialized on demand
pub(crate) struct ModelFixture {
    pub(crate) spec: TaskSpec,
    pub(crate) network: NetworkParams,
    pub(crate) languages: Vec<String>,
}

impl ModelFixture {
    /// Model whose probabilities are `probabilities` whatever the input
    pub(crate) fn constant(languages: &[&str], probabilities: &[f32]) -> Self {
        let table = EmbeddingTable::new(
            CHARGRAM_TABLE,
            Combiner::Sum,
            Array2::zeros((CHARGRAM_BUCKETS, 1)),
        );
        let bias = probabilities.iter().map(|p| p.ln()).collect::<Array1<f32>>();
        let layer = Layer::new(
            Array2::zeros((probabilities.len(), 1)),
            bias,
            Activation::Identity,
        )
        .unwrap();
        let options = FeatureExtractionOptions {
            num_buckets: CHARGRAM_BUCKETS,
            ..Default::default()
        };
        Self {
            spec: base_spec().with_feature(FeatureDomainSpec::chargrams(CHARGRAM_TABLE, options)),
            network: NetworkParams::new(vec![table], 0, vec![layer]).unwrap(),
            languages: languages.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Replace the language list
    pub(crate) fn languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Drop the declaration of a named input
    pub(crate) fn without_input(mut self, name: &str) -> Self {
        self.spec.inputs.retain(|input| input.name != name);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut languages = Vec::new();
        write_language_map(&mut languages, &self.languages).unwrap();
        ModelContainerBuilder::new(self.spec.clone())
            .file(NETWORK_FILE, self.network.to_bytes().unwrap())
            .file(LANGUAGES_FILE, languages)
            .build()
            .unwrap()
    }
}

fn base_spec() -> TaskSpec {
    TaskSpec::default()
        .with_parameter(RELIABILITY_THRESHOLD_PARAM, ParameterValue::Float(0.5))
        .with_input(NETWORK_INPUT, NETWORK_FILE)
        .with_input(LANGUAGE_MAP_INPUT, LANGUAGES_FILE)
}

pub(crate) fn constant_model(languages: &[&str], probabilities: &[f32]) -> Vec<u8> {
    ModelFixture::constant(languages, probabilities).build()
}

/// "en" for Latin text, "ru" for Cyrillic text
pub(crate) fn script_model() -> Vec<u8> {
    let mut rows = Array2::<f32>::zeros((Script::COUNT, 2));
    rows[[Script::Latin.id() as usize, 0]] = 1.0;
    rows[[Script::Cyrillic.id() as usize, 1]] = 1.0;
    let table = EmbeddingTable::new("script", Combiner::Sum, rows);
    let layer = Layer::new(Array2::from_diag_elem(2, 4.0), Array1::zeros(2), Activation::Identity).unwrap();
    ModelFixture {
        spec: base_spec().with_feature(FeatureDomainSpec::relevant_script("script")),
        network: NetworkParams::new(vec![table], 0, vec![layer]).unwrap(),
        languages: vec!["en".to_string(), "ru".to_string()],
    }
    .build()
}
