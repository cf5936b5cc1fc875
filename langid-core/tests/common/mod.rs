//! Model fixtures shared by the integration tests

#![allow(dead_code)]

use langid_core::model::{
    write_language_map, Activation, Combiner, EmbeddingTable, Layer, ParameterValue,
    LANGUAGE_MAP_INPUT, NETWORK_INPUT, RELIABILITY_THRESHOLD_PARAM,
};
use langid_core::unicode::Script;
use langid_core::{
    FeatureDomainSpec, FeatureExtractionOptions, ModelContainerBuilder, NetworkParams, TaskSpec,
};
use ndarray::{Array1, Array2};

pub const NETWORK_FILE: &str = "network.bin";
pub const LANGUAGES_FILE: &str = "languages.bin";

/// Task spec declaring both required inputs and the threshold parameter
pub fn base_spec(threshold: f64) -> TaskSpec {
    TaskSpec::default()
        .with_parameter(RELIABILITY_THRESHOLD_PARAM, ParameterValue::Float(threshold))
        .with_input(NETWORK_INPUT, NETWORK_FILE)
        .with_input(LANGUAGE_MAP_INPUT, LANGUAGES_FILE)
}

/// Serialize a model from its parts
pub fn build_model(spec: TaskSpec, network: &NetworkParams, languages: &[&str]) -> Vec<u8> {
    let mut language_map = Vec::new();
    write_language_map(&mut language_map, languages).unwrap();
    ModelContainerBuilder::new(spec)
        .file(NETWORK_FILE, network.to_bytes().unwrap())
        .file(LANGUAGES_FILE, language_map)
        .build()
        .unwrap()
}

/// Model that returns `probabilities` for every input
pub fn constant_model(languages: &[&str], probabilities: &[f32]) -> Vec<u8> {
    let buckets = 32;
    let table = EmbeddingTable::new("chargrams", Combiner::Sum, Array2::zeros((buckets, 1)));
    let bias: Array1<f32> = probabilities.iter().map(|p| p.ln()).collect();
    let layer = Layer::new(
        Array2::zeros((probabilities.len(), 1)),
        bias,
        Activation::Identity,
    )
    .unwrap();
    let network = NetworkParams::new(vec![table], 0, vec![layer]).unwrap();
    let options = FeatureExtractionOptions {
        num_buckets: buckets,
        ..Default::default()
    };
    let spec = base_spec(0.5).with_feature(FeatureDomainSpec::chargrams("chargrams", options));
    build_model(spec, &network, languages)
}

/// Model telling Latin ("en"), Cyrillic ("ru") and Greek ("el") text apart,
/// with a chargram domain feeding a hidden layer alongside the script
/// domain
pub fn script_model() -> Vec<u8> {
    let languages = [Script::Latin, Script::Cyrillic, Script::Greek];

    let mut script_rows = Array2::<f32>::zeros((Script::COUNT, languages.len()));
    for (column, script) in languages.iter().enumerate() {
        script_rows[[script.id() as usize, column]] = 1.0;
    }
    let script_table = EmbeddingTable::new("script", Combiner::Sum, script_rows);

    let buckets = 64;
    let chargram_rows = Array2::from_shape_fn((buckets, 2), |(row, col)| {
        ((row * 7 + col * 3) % 11) as f32 / 110.0
    });
    let chargram_table = EmbeddingTable::new("chargrams", Combiner::Mean, chargram_rows);

    // Input: 3 script values, 2 chargram values, 1 dense case value.
    let mut hidden_weights = Array2::<f32>::zeros((3, 6));
    for i in 0..3 {
        hidden_weights[[i, i]] = 5.0;
    }
    hidden_weights[[0, 3]] = 0.1;
    hidden_weights[[1, 4]] = 0.1;
    hidden_weights[[2, 5]] = 0.01;
    let hidden = Layer::new(hidden_weights, Array1::zeros(3), Activation::Relu).unwrap();
    let output = Layer::new(Array2::eye(3), Array1::zeros(3), Activation::Identity).unwrap();

    let network = NetworkParams::new(vec![script_table, chargram_table], 1, vec![hidden, output])
        .unwrap();

    let options = FeatureExtractionOptions {
        num_buckets: buckets,
        chargram_orders: vec![1, 2, 3],
        extract_case_feature: true,
        ..Default::default()
    };
    // Declared in a different order than the tables; wiring reorders them.
    let spec = base_spec(0.4)
        .with_feature(FeatureDomainSpec::chargrams("chargrams", options))
        .with_feature(FeatureDomainSpec::relevant_script("script"));
    build_model(spec, &network, &["en", "ru", "el"])
}
