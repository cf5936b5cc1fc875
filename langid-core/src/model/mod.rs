//! Model loading
//!
//! A model is a single container (see [`container`]) holding a TOML task
//! spec plus named files. Two files are required: the network parameters
//! and the language list. Everything is validated before it is trusted; a
//! model that loads successfully cannot cause an out-of-bounds access at
//! query time.

mod bytes;
pub mod container;
mod languages;
mod network_params;
mod reader;
mod task_spec;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bytes::ModelBytes;
pub use container::{ModelContainer, ModelContainerBuilder};
pub use languages::{parse_language_map, parse_list_of_strings, write_language_map, write_list_of_strings};
pub use network_params::{Activation, Combiner, EmbeddingTable, Layer, NetworkParams};
pub use task_spec::{ParameterValue, TaskInput, TaskSpec};

use crate::error::{FeatureError, ModelError, Result};
use crate::features::{DomainFeatures, FeatureDomain};
use crate::network::EmbeddingNetwork;
use crate::softmax::compute_softmax;
use crate::tokenizer::Tokenizer;

/// Input holding the network parameters
pub const NETWORK_INPUT: &str = "language-identifier-network";

/// Input holding the language list
pub const LANGUAGE_MAP_INPUT: &str = "language-name-id-map";

/// Parameter holding the default probability threshold
pub const RELIABILITY_THRESHOLD_PARAM: &str = "reliability_thresh";

/// A fully validated model, ready for inference
#[derive(Debug, Clone)]
pub struct LanguageModel {
    tokenizer: Tokenizer,
    /// Ordered like the network's embedding tables
    domains: Vec<FeatureDomain>,
    network: EmbeddingNetwork,
    languages: Vec<String>,
    reliability_threshold: f32,
}

impl LanguageModel {
    /// Parse and validate a model
    ///
    /// Parameters and language codes are copied out of `bytes`, so the
    /// buffer may be dropped afterwards.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let container = ModelContainer::parse(bytes)?;
        let spec = container.task_spec();

        let params = NetworkParams::parse(container.bytes_for_input(NETWORK_INPUT)?)?;
        let languages = parse_language_map(container.bytes_for_input(LANGUAGE_MAP_INPUT)?)?;
        if languages.len() != params.output_dim() {
            return Err(ModelError::LanguageCountMismatch {
                languages: languages.len(),
                outputs: params.output_dim(),
            });
        }

        let reliability_threshold = spec
            .get_float(RELIABILITY_THRESHOLD_PARAM)
            .ok_or_else(|| ModelError::MissingParameter(RELIABILITY_THRESHOLD_PARAM.to_string()))?
            as f32;

        let domains = wire_domains(spec, &params)?;

        tracing::debug!(
            languages = languages.len(),
            domains = domains.len(),
            layers = params.layers().len(),
            "loaded language identification model"
        );

        Ok(Self {
            tokenizer: Tokenizer::new(spec.tokenizer.clone()),
            domains,
            network: EmbeddingNetwork::new(params),
            languages,
            reliability_threshold,
        })
    }

    /// Language codes, in network output order
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Default probability threshold stored in the model
    pub fn reliability_threshold(&self) -> f32 {
        self.reliability_threshold
    }

    /// Tokenizer configured by the model
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Feature domains, one per embedding table
    pub fn domains(&self) -> &[FeatureDomain] {
        &self.domains
    }

    /// Network evaluator
    pub fn network(&self) -> &EmbeddingNetwork {
        &self.network
    }

    /// Per-domain features of `text`
    pub fn extract_features(&self, text: &str) -> Vec<DomainFeatures> {
        let tokens = self.tokenizer.tokenize(text);
        self.domains
            .iter()
            .map(|domain| domain.extract(&tokens))
            .collect()
    }

    /// Raw network scores of `text`
    pub fn raw_scores(&self, text: &str) -> std::result::Result<Vec<f32>, FeatureError> {
        self.network
            .compute_final_scores(&self.extract_features(text))
    }

    /// Probability of each language, in [`LanguageModel::languages`] order
    ///
    /// Empty when the scores cannot be normalized.
    pub fn score(&self, text: &str) -> Vec<f32> {
        match self.raw_scores(text) {
            Ok(raw) => compute_softmax(&raw),
            Err(e) => {
                tracing::warn!("unable to score text: {e}");
                Vec::new()
            }
        }
    }
}

/// Build the declared feature domains in embedding table order, checking
/// that each table is fed by exactly one compatible domain
fn wire_domains(spec: &TaskSpec, params: &NetworkParams) -> Result<Vec<FeatureDomain>> {
    let mut declared: Vec<FeatureDomain> = Vec::with_capacity(spec.features.len());
    for feature in &spec.features {
        if declared.iter().any(|domain| domain.name() == feature.name) {
            return Err(FeatureError::DuplicateDomain {
                domain: feature.name.clone(),
            }
            .into());
        }
        let domain = FeatureDomain::from_spec(feature)?;
        let table = params
            .embedding(domain.name())
            .ok_or_else(|| FeatureError::UnknownEmbedding {
                domain: domain.name().to_string(),
            })?;
        if domain.id_space() > table.rows() {
            return Err(FeatureError::IdSpaceExceedsTable {
                domain: domain.name().to_string(),
                id_space: domain.id_space(),
                rows: table.rows(),
            }
            .into());
        }
        declared.push(domain);
    }

    let mut ordered = Vec::with_capacity(declared.len());
    for table in params.embeddings() {
        let index = declared
            .iter()
            .position(|domain| domain.name() == table.name)
            .ok_or_else(|| FeatureError::UnusedEmbedding {
                name: table.name.clone(),
            })?;
        ordered.push(declared.swap_remove(index));
    }

    let dense: usize = ordered.iter().map(FeatureDomain::dense_dim).sum();
    if dense != params.dense_dim() {
        return Err(FeatureError::DenseDimensionMismatch {
            expected: params.dense_dim(),
            actual: dense,
        }
        .into());
    }
    Ok(ordered)
}
