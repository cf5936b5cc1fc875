//! Embedding tables and feed-forward layers of a trained network
//!
//! Layout of the serialized blob (little-endian):
//!
//! ```text
//! "LIDN"
//! u32 embedding count
//!     string name, u32 rows, u32 dim, u8 combiner, rows*dim f32
//! u32 dense input size
//! u32 layer count
//!     u32 input dim, u32 output dim, u8 activation,
//!     output*input f32 weights (one row per output), output f32 bias
//! ```

use super::reader::{ByteReader, ReadError, WriteModelExt};
use crate::error::{ModelError, Result};
use byteorder::WriteBytesExt;
use ndarray::{Array1, Array2};
use std::io::{self, Write};

/// Magic number of the network parameters blob
pub const NETWORK_MAGIC: &[u8; 4] = b"LIDN";

/// How the embedding vectors of a domain's ids are pooled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combiner {
    /// Weighted sum
    #[default]
    Sum,
    /// Weighted sum divided by the total weight
    Mean,
}

impl Combiner {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Combiner::Sum),
            1 => Some(Combiner::Mean),
            _ => None,
        }
    }

    fn tag(self) -> u8 {
        match self {
            Combiner::Sum => 0,
            Combiner::Mean => 1,
        }
    }
}

/// Nonlinearity applied after a layer's affine transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// No activation
    #[default]
    Identity,
    /// max(0, x)
    Relu,
    /// Hyperbolic tangent
    Tanh,
    /// Logistic sigmoid
    Sigmoid,
}

impl Activation {
    /// Apply the activation to one value
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Identity => x,
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Activation::Identity),
            1 => Some(Activation::Relu),
            2 => Some(Activation::Tanh),
            3 => Some(Activation::Sigmoid),
            _ => None,
        }
    }

    fn tag(self) -> u8 {
        match self {
            Activation::Identity => 0,
            Activation::Relu => 1,
            Activation::Tanh => 2,
            Activation::Sigmoid => 3,
        }
    }
}

/// Maps the ids of one feature domain to learned vectors
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    /// Name of the feature domain feeding the table
    pub name: String,
    /// Pooling of the looked-up vectors
    pub combiner: Combiner,
    /// One row per id
    pub weights: Array2<f32>,
}

impl EmbeddingTable {
    /// Create a table from its rows
    pub fn new(name: impl Into<String>, combiner: Combiner, weights: Array2<f32>) -> Self {
        Self {
            name: name.into(),
            combiner,
            weights,
        }
    }

    /// Number of ids the table covers
    pub fn rows(&self) -> usize {
        self.weights.nrows()
    }

    /// Width of each embedding vector
    pub fn dim(&self) -> usize {
        self.weights.ncols()
    }
}

/// Fully connected layer computing `activation(W·x + b)`
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Weight matrix, one row per output
    pub weights: Array2<f32>,
    /// Bias, one entry per output
    pub bias: Array1<f32>,
    /// Activation applied to the output
    pub activation: Activation,
}

impl Layer {
    /// Create a layer; the bias must have one entry per weight row
    pub fn new(weights: Array2<f32>, bias: Array1<f32>, activation: Activation) -> Result<Self> {
        if bias.len() != weights.nrows() {
            return Err(ModelError::MalformedNetwork(format!(
                "bias has {} entries for {} outputs",
                bias.len(),
                weights.nrows()
            )));
        }
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    /// Input dimension
    pub fn input_dim(&self) -> usize {
        self.weights.ncols()
    }

    /// Output dimension
    pub fn output_dim(&self) -> usize {
        self.weights.nrows()
    }
}

/// Parameters of an embedding network
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParams {
    embeddings: Vec<EmbeddingTable>,
    dense_dim: usize,
    layers: Vec<Layer>,
}

impl NetworkParams {
    /// Assemble and validate network parameters
    pub fn new(embeddings: Vec<EmbeddingTable>, dense_dim: usize, layers: Vec<Layer>) -> Result<Self> {
        let params = Self {
            embeddings,
            dense_dim,
            layers,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parse and validate a serialized blob
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let malformed = |e: ReadError| ModelError::MalformedNetwork(e.to_string());
        let mut reader = ByteReader::new(bytes);
        reader.expect_magic(NETWORK_MAGIC).map_err(malformed)?;

        let num_embeddings = reader.read_len("embedding count").map_err(malformed)?;
        let mut embeddings = Vec::new();
        for _ in 0..num_embeddings {
            embeddings.push(Self::read_embedding(&mut reader)?);
        }

        let dense_dim = reader.read_len("dense input size").map_err(malformed)?;

        let num_layers = reader.read_len("layer count").map_err(malformed)?;
        let mut layers = Vec::new();
        for _ in 0..num_layers {
            layers.push(Self::read_layer(&mut reader)?);
        }
        reader.finish().map_err(malformed)?;

        Self::new(embeddings, dense_dim, layers)
    }

    fn read_embedding(reader: &mut ByteReader<'_>) -> Result<EmbeddingTable> {
        let malformed = |e: ReadError| ModelError::MalformedNetwork(e.to_string());
        let name = reader.read_string("embedding name").map_err(malformed)?;
        let rows = reader.read_len("embedding rows").map_err(malformed)?;
        let dim = reader.read_len("embedding dim").map_err(malformed)?;
        let tag = reader.read_u8("combiner").map_err(malformed)?;
        let combiner = Combiner::from_tag(tag).ok_or_else(|| {
            ModelError::MalformedNetwork(format!("embedding '{name}' has unknown combiner {tag}"))
        })?;
        let count = rows.checked_mul(dim).ok_or_else(|| {
            ModelError::MalformedNetwork(format!("embedding '{name}' is too large"))
        })?;
        let values = reader.read_f32s(count, "embedding weights").map_err(malformed)?;
        let weights = Array2::from_shape_vec((rows, dim), values)
            .map_err(|e| ModelError::MalformedNetwork(e.to_string()))?;
        Ok(EmbeddingTable::new(name, combiner, weights))
    }

    fn read_layer(reader: &mut ByteReader<'_>) -> Result<Layer> {
        let malformed = |e: ReadError| ModelError::MalformedNetwork(e.to_string());
        let input_dim = reader.read_len("layer input dim").map_err(malformed)?;
        let output_dim = reader.read_len("layer output dim").map_err(malformed)?;
        let tag = reader.read_u8("activation").map_err(malformed)?;
        let activation = Activation::from_tag(tag)
            .ok_or_else(|| ModelError::MalformedNetwork(format!("unknown activation {tag}")))?;
        let count = input_dim
            .checked_mul(output_dim)
            .ok_or_else(|| ModelError::MalformedNetwork("layer is too large".to_string()))?;
        let values = reader.read_f32s(count, "layer weights").map_err(malformed)?;
        let weights = Array2::from_shape_vec((output_dim, input_dim), values)
            .map_err(|e| ModelError::MalformedNetwork(e.to_string()))?;
        let bias = reader.read_f32s(output_dim, "layer bias").map_err(malformed)?;
        Layer::new(weights, Array1::from(bias), activation)
    }

    /// Check that consecutive stages agree on their dimensions
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(ModelError::MalformedNetwork(
                "network has no layers".to_string(),
            ));
        }
        for (index, table) in self.embeddings.iter().enumerate() {
            if self.embeddings[..index].iter().any(|t| t.name == table.name) {
                return Err(ModelError::MalformedNetwork(format!(
                    "duplicate embedding table '{}'",
                    table.name
                )));
            }
        }

        let mut expected = self.concat_dim();
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.bias.len() != layer.output_dim() {
                return Err(ModelError::MalformedNetwork(format!(
                    "layer {index} has {} bias entries for {} outputs",
                    layer.bias.len(),
                    layer.output_dim()
                )));
            }
            if layer.input_dim() != expected {
                return Err(ModelError::DimensionMismatch {
                    layer: index,
                    expected,
                    actual: layer.input_dim(),
                });
            }
            expected = layer.output_dim();
        }
        Ok(())
    }

    /// Embedding tables in input order
    pub fn embeddings(&self) -> &[EmbeddingTable] {
        &self.embeddings
    }

    /// Table fed by the named domain
    pub fn embedding(&self, name: &str) -> Option<&EmbeddingTable> {
        self.embeddings.iter().find(|table| table.name == name)
    }

    /// Number of dense values appended after the embeddings
    pub fn dense_dim(&self) -> usize {
        self.dense_dim
    }

    /// Feed-forward layers in evaluation order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Width of the network input: all embedding widths plus dense values
    pub fn concat_dim(&self) -> usize {
        self.embeddings.iter().map(EmbeddingTable::dim).sum::<usize>() + self.dense_dim
    }

    /// Width of the final layer's output
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, Layer::output_dim)
    }

    /// Serialize in the format read by [`NetworkParams::parse`]
    pub fn serialize<W: Write>(&self, mut wtr: W) -> io::Result<()> {
        wtr.write_all(NETWORK_MAGIC)?;
        wtr.write_len(self.embeddings.len(), "embedding count")?;
        for table in &self.embeddings {
            wtr.write_string(&table.name, "embedding name")?;
            wtr.write_len(table.rows(), "embedding rows")?;
            wtr.write_len(table.dim(), "embedding dim")?;
            wtr.write_u8(table.combiner.tag())?;
            wtr.write_f32s(&table.weights.iter().copied().collect::<Vec<_>>())?;
        }
        wtr.write_len(self.dense_dim, "dense input size")?;
        wtr.write_len(self.layers.len(), "layer count")?;
        for layer in &self.layers {
            wtr.write_len(layer.input_dim(), "layer input dim")?;
            wtr.write_len(layer.output_dim(), "layer output dim")?;
            wtr.write_u8(layer.activation.tag())?;
            wtr.write_f32s(&layer.weights.iter().copied().collect::<Vec<_>>())?;
            wtr.write_f32s(&layer.bias.to_vec())?;
        }
        Ok(())
    }

    /// Serialize into a new buffer
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.serialize(&mut bytes)?;
        Ok(bytes)
    }
}
