//! Feed-forward evaluation of an embedding network

use crate::error::FeatureError;
use crate::features::DomainFeatures;
use crate::model::{Combiner, EmbeddingTable, NetworkParams};
use ndarray::Array1;

/// Evaluates validated [`NetworkParams`]
///
/// Immutable after construction; shared freely between threads.
#[derive(Debug, Clone)]
pub struct EmbeddingNetwork {
    params: NetworkParams,
}

impl EmbeddingNetwork {
    /// Wrap parameters that have passed [`NetworkParams::validate`]
    pub fn new(params: NetworkParams) -> Self {
        Self { params }
    }

    /// Network parameters
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Number of raw scores produced
    pub fn output_dim(&self) -> usize {
        self.params.output_dim()
    }

    /// Raw scores for the features of every domain
    ///
    /// `features[i]` is looked up in the i-th embedding table. The pooled
    /// embeddings are concatenated in table order, followed by the dense
    /// values of all domains in the same order, and the result is passed
    /// through every layer.
    pub fn compute_final_scores(&self, features: &[DomainFeatures]) -> Result<Vec<f32>, FeatureError> {
        let tables = self.params.embeddings();
        if features.len() != tables.len() {
            return Err(FeatureError::DomainCountMismatch {
                expected: tables.len(),
                actual: features.len(),
            });
        }
        let dense_len: usize = features.iter().map(|f| f.dense.len()).sum();
        if dense_len != self.params.dense_dim() {
            return Err(FeatureError::DenseDimensionMismatch {
                expected: self.params.dense_dim(),
                actual: dense_len,
            });
        }

        let mut input = Vec::with_capacity(self.params.concat_dim());
        for (table, domain) in tables.iter().zip(features) {
            input.extend(pool(table, domain).iter());
        }
        for domain in features {
            input.extend_from_slice(&domain.dense);
        }

        let mut activations = Array1::from(input);
        for layer in self.params.layers() {
            let mut output = layer.weights.dot(&activations) + &layer.bias;
            output.mapv_inplace(|x| layer.activation.apply(x));
            activations = output;
        }
        Ok(activations.to_vec())
    }
}

/// Combine the rows selected by a domain's sparse ids
fn pool(table: &EmbeddingTable, domain: &DomainFeatures) -> Array1<f32> {
    let mut pooled = Array1::zeros(table.dim());
    let mut total_weight = 0.0f32;
    for feature in &domain.sparse {
        let row = feature.id as usize;
        // Rows are checked against the domain's id space at load time.
        if row >= table.rows() {
            continue;
        }
        pooled.scaled_add(feature.weight, &table.weights.row(row));
        total_weight += feature.weight;
    }
    if table.combiner == Combiner::Mean && total_weight > 0.0 {
        pooled /= total_weight;
    }
    pooled
}
