//! Feature extraction
//!
//! Turns tokens into the sparse ids and dense values consumed by the
//! embedding network. Each feature domain feeds exactly one embedding
//! table.

mod domain;
mod extractor;
mod options;
mod script;

pub use domain::{FeatureDomain, FeatureDomainSpec, FeatureKind};
pub use extractor::TokenFeatureExtractor;
pub use options::{defaults, FeatureExtractionOptions};
pub use script::RelevantScriptFeature;

use smallvec::SmallVec;

/// Features of a single token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    /// Bucket ids; duplicates are meaningful and add pooling weight
    pub sparse: Vec<u32>,
    /// Dense side features in declared order
    pub dense: SmallVec<[f32; 4]>,
}

/// Sparse id with a pooling weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseFeature {
    /// Row of the embedding table
    pub id: u32,
    /// Weight applied to the row when pooling
    pub weight: f32,
}

impl SparseFeature {
    /// Feature with weight 1
    pub fn unit(id: u32) -> Self {
        Self { id, weight: 1.0 }
    }
}

/// Features of a whole text for one domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainFeatures {
    /// Weighted ids looked up in the domain's embedding table
    pub sparse: Vec<SparseFeature>,
    /// Dense values appended to the network input
    pub dense: Vec<f32>,
}
