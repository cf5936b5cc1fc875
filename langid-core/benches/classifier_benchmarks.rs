//! Benchmarks for tokenization, feature extraction and classification

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use langid_core::model::{
    write_language_map, Activation, Combiner, EmbeddingTable, Layer, ParameterValue,
    LANGUAGE_MAP_INPUT, NETWORK_INPUT, RELIABILITY_THRESHOLD_PARAM,
};
use langid_core::{
    FeatureDomainSpec, FeatureExtractionOptions, LanguageClassifier, ModelContainerBuilder,
    NetworkParams, TaskSpec, Tokenizer,
};
use ndarray::{Array1, Array2};
use std::hint::black_box;

const NUM_BUCKETS: usize = 1000;
const EMBEDDING_DIM: usize = 16;
const HIDDEN_DIM: usize = 32;
const LANGUAGES: [&str; 8] = ["en", "fr", "de", "es", "it", "ru", "el", "ja"];

/// Model of realistic shape with deterministic pseudo-random weights
fn build_model() -> Vec<u8> {
    let weight = |seed: usize| (seed.wrapping_mul(2_654_435_761) % 1000) as f32 / 1000.0 - 0.5;

    let table = EmbeddingTable::new(
        "chargrams",
        Combiner::Mean,
        Array2::from_shape_fn((NUM_BUCKETS, EMBEDDING_DIM), |(r, c)| weight(r * 31 + c)),
    );
    let hidden = Layer::new(
        Array2::from_shape_fn((HIDDEN_DIM, EMBEDDING_DIM), |(r, c)| weight(r * 17 + c + 7)),
        Array1::zeros(HIDDEN_DIM),
        Activation::Relu,
    )
    .unwrap();
    let output = Layer::new(
        Array2::from_shape_fn((LANGUAGES.len(), HIDDEN_DIM), |(r, c)| weight(r * 13 + c + 3)),
        Array1::zeros(LANGUAGES.len()),
        Activation::Identity,
    )
    .unwrap();
    let network = NetworkParams::new(vec![table], 0, vec![hidden, output]).unwrap();

    let spec = TaskSpec::default()
        .with_parameter(RELIABILITY_THRESHOLD_PARAM, ParameterValue::Float(0.5))
        .with_input(NETWORK_INPUT, "network.bin")
        .with_input(LANGUAGE_MAP_INPUT, "languages.bin")
        .with_feature(FeatureDomainSpec::chargrams(
            "chargrams",
            FeatureExtractionOptions::default(),
        ));

    let mut languages = Vec::new();
    write_language_map(&mut languages, &LANGUAGES).unwrap();
    ModelContainerBuilder::new(spec)
        .file("network.bin", network.to_bytes().unwrap())
        .file("languages.bin", languages)
        .build()
        .unwrap()
}

fn sample_texts() -> Vec<(&'static str, String)> {
    let sentence = "The quick brown fox jumps over the lazy dog. ";
    vec![
        ("short", "Bonjour".to_string()),
        ("sentence", sentence.to_string()),
        ("paragraph", sentence.repeat(20)),
        ("mixed", "Hello мир Καλημέρα 世界 ".repeat(10)),
    ]
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let tokenizer = Tokenizer::default();
    for (name, text) in sample_texts() {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| tokenizer.tokenize(black_box(text)));
        });
    }
    group.finish();
}

fn bench_find_language(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_language");
    let classifier = LanguageClassifier::from_bytes(&build_model());
    assert!(classifier.is_valid());
    for (name, text) in sample_texts() {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| classifier.find_language(black_box(text)));
        });
    }
    group.finish();
}

fn bench_model_load(c: &mut Criterion) {
    let bytes = build_model();
    c.bench_function("model_load", |b| {
        b.iter(|| LanguageClassifier::from_bytes(black_box(&bytes)));
    });
}

criterion_group!(benches, bench_tokenize, bench_find_language, bench_model_load);
criterion_main!(benches);
