//! Feature domains: one per embedding table
//!
//! The set of feature kinds is closed. Each domain is declared in the
//! model's task spec and built once when the model is loaded.

use super::extractor::TokenFeatureExtractor;
use super::options::FeatureExtractionOptions;
use super::script::RelevantScriptFeature;
use super::{DomainFeatures, SparseFeature};
use crate::error::FeatureError;
use crate::tokenizer::Token;
use serde::{Deserialize, Serialize};

/// Declaration of a feature domain, as written in the task spec
///
/// ```toml
/// [[features]]
/// name = "chargrams"
/// kind = "chargrams"
/// num_buckets = 1000
/// chargram_orders = [1, 2, 3]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDomainSpec {
    /// Name of the embedding table fed by this domain
    pub name: String,
    /// Feature kind and its options
    #[serde(flatten)]
    pub kind: FeatureKind,
}

/// Supported feature kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FeatureKind {
    /// Hashed character n-grams of every token
    Chargrams(FeatureExtractionOptions),
    /// Distribution of scripts over the text
    RelevantScript,
}

impl FeatureDomainSpec {
    /// Character n-gram domain
    pub fn chargrams(name: impl Into<String>, options: FeatureExtractionOptions) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Chargrams(options),
        }
    }

    /// Script distribution domain
    pub fn relevant_script(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::RelevantScript,
        }
    }
}

/// Extractor of a named feature domain
#[derive(Debug, Clone)]
pub enum FeatureDomain {
    /// Hashed character n-grams
    Chargrams {
        /// Domain name
        name: String,
        /// Per-token extractor
        extractor: TokenFeatureExtractor,
    },
    /// Script distribution
    RelevantScript {
        /// Domain name
        name: String,
        /// Whole-text extractor
        feature: RelevantScriptFeature,
    },
}

impl FeatureDomain {
    /// Build the extractor for a declared domain
    pub fn from_spec(spec: &FeatureDomainSpec) -> Result<Self, FeatureError> {
        match &spec.kind {
            FeatureKind::Chargrams(options) => {
                let extractor = TokenFeatureExtractor::new(options.clone()).map_err(|e| {
                    FeatureError::InvalidDomain {
                        domain: spec.name.clone(),
                        source: Box::new(e),
                    }
                })?;
                Ok(FeatureDomain::Chargrams {
                    name: spec.name.clone(),
                    extractor,
                })
            }
            FeatureKind::RelevantScript => Ok(FeatureDomain::RelevantScript {
                name: spec.name.clone(),
                feature: RelevantScriptFeature,
            }),
        }
    }

    /// Domain name, equal to the name of its embedding table
    pub fn name(&self) -> &str {
        match self {
            FeatureDomain::Chargrams { name, .. } | FeatureDomain::RelevantScript { name, .. } => {
                name
            }
        }
    }

    /// Number of distinct sparse ids the domain can emit
    pub fn id_space(&self) -> usize {
        match self {
            FeatureDomain::Chargrams { extractor, .. } => extractor.options().num_buckets,
            FeatureDomain::RelevantScript { feature, .. } => feature.id_space(),
        }
    }

    /// Number of dense values the domain contributes to the network input
    pub fn dense_dim(&self) -> usize {
        match self {
            FeatureDomain::Chargrams { extractor, .. } => extractor.dense_dim(),
            FeatureDomain::RelevantScript { .. } => 0,
        }
    }

    /// Features of the whole token sequence
    ///
    /// Character n-gram ids of all tokens are pooled with weight 1 each, so
    /// repeated n-grams count several times. Dense values are averaged over
    /// the tokens and are all zero when there are none.
    pub fn extract(&self, tokens: &[Token]) -> DomainFeatures {
        match self {
            FeatureDomain::Chargrams { extractor, .. } => {
                let mut sparse = Vec::new();
                let mut dense = vec![0.0f32; extractor.dense_dim()];
                for features in extractor.extract_all(tokens) {
                    sparse.extend(features.sparse.into_iter().map(SparseFeature::unit));
                    for (sum, value) in dense.iter_mut().zip(&features.dense) {
                        *sum += value;
                    }
                }
                if !tokens.is_empty() {
                    let count = tokens.len() as f32;
                    dense.iter_mut().for_each(|value| *value /= count);
                }
                DomainFeatures { sparse, dense }
            }
            FeatureDomain::RelevantScript { feature, .. } => DomainFeatures {
                sparse: feature.extract(tokens),
                dense: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::Script;

    #[derive(Debug, Deserialize, Serialize)]
    struct Wrapper {
        features: Vec<FeatureDomainSpec>,
    }

    #[test]
    fn test_spec_from_toml() {
        let wrapper: Wrapper = toml::from_str(
            r#"
            [[features]]
            name = "chargrams"
            kind = "chargrams"
            num_buckets = 64
            chargram_orders = [1, 2]
            remap_digits = true

            [[features]]
            name = "script"
            kind = "relevant-script"
            "#,
        )
        .unwrap();

        assert_eq!(wrapper.features.len(), 2);
        match &wrapper.features[0].kind {
            FeatureKind::Chargrams(options) => {
                assert_eq!(options.num_buckets, 64);
                assert_eq!(options.chargram_orders, vec![1, 2]);
                assert!(options.remap_digits);
                assert!(options.unicode_aware_features);
            }
            other => panic!("Expected chargrams, got {other:?}"),
        }
        assert_eq!(wrapper.features[1], FeatureDomainSpec::relevant_script("script"));
    }

    #[test]
    fn test_spec_toml_round_trip() {
        let wrapper = Wrapper {
            features: vec![
                FeatureDomainSpec::chargrams("words", FeatureExtractionOptions::default()),
                FeatureDomainSpec::relevant_script("script"),
            ],
        };
        let text = toml::to_string(&wrapper).unwrap();
        let parsed: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(parsed.features, wrapper.features);
    }

    #[test]
    fn test_invalid_options_name_the_domain() {
        let spec = FeatureDomainSpec::chargrams(
            "words",
            FeatureExtractionOptions {
                num_buckets: 0,
                ..Default::default()
            },
        );
        match FeatureDomain::from_spec(&spec) {
            Err(FeatureError::InvalidDomain { domain, source }) => {
                assert_eq!(domain, "words");
                assert_eq!(*source, FeatureError::ZeroBuckets);
            }
            other => panic!("Expected InvalidDomain, got {other:?}"),
        }
    }

    #[test]
    fn test_chargram_domain_pools_tokens() {
        let options = FeatureExtractionOptions {
            num_buckets: 100,
            chargram_orders: vec![1],
            extract_case_feature: true,
            ..Default::default()
        };
        let domain =
            FeatureDomain::from_spec(&FeatureDomainSpec::chargrams("words", options)).unwrap();
        assert_eq!(domain.name(), "words");
        assert_eq!(domain.id_space(), 100);
        assert_eq!(domain.dense_dim(), 1);

        let tokens = vec![Token::new("Ab", 0, 2), Token::new("a", 3, 4)];
        let features = domain.extract(&tokens);
        assert_eq!(features.sparse.len(), 3);
        assert!(features.sparse.iter().all(|f| f.weight == 1.0));
        // One uppercase start (+1) and one lowercase start (-1).
        assert_eq!(features.dense, vec![0.0]);
    }

    #[test]
    fn test_chargram_domain_without_tokens() {
        let options = FeatureExtractionOptions {
            regexp_features: vec!["x".to_string()],
            ..Default::default()
        };
        let domain =
            FeatureDomain::from_spec(&FeatureDomainSpec::chargrams("words", options)).unwrap();
        let features = domain.extract(&[]);
        assert!(features.sparse.is_empty());
        assert_eq!(features.dense, vec![0.0]);
    }

    #[test]
    fn test_script_domain() {
        let domain =
            FeatureDomain::from_spec(&FeatureDomainSpec::relevant_script("script")).unwrap();
        assert_eq!(domain.id_space(), Script::COUNT);
        assert_eq!(domain.dense_dim(), 0);

        let features = domain.extract(&[Token::new("мир", 0, 6)]);
        assert_eq!(features.sparse.len(), 1);
        assert_eq!(features.sparse[0].id, Script::Cyrillic.id());
        assert!(features.dense.is_empty());
    }
}
