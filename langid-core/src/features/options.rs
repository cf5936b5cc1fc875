//! Options for character n-gram feature extraction

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};

/// Default configuration constants
pub mod defaults {
    /// Number of hash buckets
    pub const NUM_BUCKETS: usize = 1000;

    /// Character n-gram orders
    pub const CHARGRAM_ORDERS: [usize; 4] = [1, 2, 3, 4];

    /// Words longer than this many characters are trimmed
    pub const MAX_WORD_LENGTH: usize = 20;
}

/// Configuration of a [`super::TokenFeatureExtractor`]
///
/// Loaded once with the model and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureExtractionOptions {
    /// Size of the hashed id space
    pub num_buckets: usize,

    /// Character n-gram orders to extract, in extraction order
    pub chargram_orders: Vec<usize>,

    /// Words longer than this are reduced to a prefix and a suffix of
    /// `max_word_length / 2` characters each
    pub max_word_length: usize,

    /// Replace every decimal digit with `0` before extracting n-grams
    pub remap_digits: bool,

    /// Work on codepoints instead of bytes
    pub unicode_aware_features: bool,

    /// Emit +1/-1 depending on whether the token starts uppercase
    pub extract_case_feature: bool,

    /// Emit a feature telling whether the token lies in the span of interest
    pub extract_selection_mask_feature: bool,

    /// One dense feature per pattern: +1 on a match, -1 otherwise
    pub regexp_features: Vec<String>,
}

impl Default for FeatureExtractionOptions {
    fn default() -> Self {
        Self {
            num_buckets: defaults::NUM_BUCKETS,
            chargram_orders: defaults::CHARGRAM_ORDERS.to_vec(),
            max_word_length: defaults::MAX_WORD_LENGTH,
            remap_digits: false,
            unicode_aware_features: true,
            extract_case_feature: false,
            extract_selection_mask_feature: false,
            regexp_features: Vec::new(),
        }
    }
}

impl FeatureExtractionOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.num_buckets == 0 {
            return Err(FeatureError::ZeroBuckets);
        }
        if self.chargram_orders.is_empty() {
            return Err(FeatureError::NoChargramOrders);
        }
        if let Some(&order) = self.chargram_orders.iter().find(|&&order| order == 0) {
            return Err(FeatureError::InvalidChargramOrder(order));
        }
        Ok(())
    }

    /// Number of dense values emitted per token
    pub fn dense_dim(&self) -> usize {
        usize::from(self.extract_case_feature)
            + usize::from(self.extract_selection_mask_feature)
            + self.regexp_features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = FeatureExtractionOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.dense_dim(), 0);
    }

    #[test]
    fn test_validation_failures() {
        let zero_buckets = FeatureExtractionOptions {
            num_buckets: 0,
            ..Default::default()
        };
        assert_eq!(zero_buckets.validate(), Err(FeatureError::ZeroBuckets));

        let no_orders = FeatureExtractionOptions {
            chargram_orders: vec![],
            ..Default::default()
        };
        assert_eq!(no_orders.validate(), Err(FeatureError::NoChargramOrders));

        let zero_order = FeatureExtractionOptions {
            chargram_orders: vec![1, 0],
            ..Default::default()
        };
        assert_eq!(
            zero_order.validate(),
            Err(FeatureError::InvalidChargramOrder(0))
        );
    }

    #[test]
    fn test_dense_dim_counts_every_side_feature() {
        let options = FeatureExtractionOptions {
            extract_case_feature: true,
            extract_selection_mask_feature: true,
            regexp_features: vec![r"^\d+$".to_string(), "[".to_string()],
            ..Default::default()
        };
        assert_eq!(options.dense_dim(), 4);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options: FeatureExtractionOptions = toml::from_str(
            r#"
            num_buckets = 50
            remap_digits = true
            "#,
        )
        .unwrap();
        assert_eq!(options.num_buckets, 50);
        assert!(options.remap_digits);
        assert_eq!(options.chargram_orders, vec![1, 2, 3, 4]);
        assert_eq!(options.max_word_length, 20);
    }
}
