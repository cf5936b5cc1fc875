//! Inspect command implementation

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::Args;
use langid_core::model::{Activation, Combiner};
use langid_core::{FeatureDomain, LanguageModel, ModelBytes};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Model file
    #[arg(short, long, value_name = "FILE", env = "LANGID_MODEL")]
    pub model: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Shape and configuration of a loaded model
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    /// Always true; invalid models are reported as errors
    pub valid: bool,
    /// Default probability threshold
    pub reliability_threshold: f32,
    /// Language codes in output order
    pub languages: Vec<String>,
    /// Feature domains in table order
    pub features: Vec<FeatureSummary>,
    /// Embedding tables
    pub embeddings: Vec<EmbeddingSummary>,
    /// Number of dense network inputs
    pub dense_inputs: usize,
    /// Feed-forward layers
    pub layers: Vec<LayerSummary>,
}

/// One feature domain
#[derive(Debug, Serialize)]
pub struct FeatureSummary {
    /// Domain name
    pub name: String,
    /// Feature kind
    pub kind: &'static str,
    /// Number of distinct ids
    pub id_space: usize,
    /// Dense values contributed
    pub dense_dim: usize,
}

/// One embedding table
#[derive(Debug, Serialize)]
pub struct EmbeddingSummary {
    /// Table name
    pub name: String,
    /// Number of rows
    pub rows: usize,
    /// Vector width
    pub dim: usize,
    /// Pooling of looked-up rows
    pub combiner: &'static str,
}

/// One feed-forward layer
#[derive(Debug, Serialize)]
pub struct LayerSummary {
    /// Input dimension
    pub input: usize,
    /// Output dimension
    pub output: usize,
    /// Activation function
    pub activation: &'static str,
}

impl ModelSummary {
    /// Summarize a loaded model
    pub fn new(model: &LanguageModel) -> Self {
        let params = model.network().params();
        Self {
            valid: true,
            reliability_threshold: model.reliability_threshold(),
            languages: model.languages().to_vec(),
            features: model
                .domains()
                .iter()
                .map(|domain| FeatureSummary {
                    name: domain.name().to_string(),
                    kind: match domain {
                        FeatureDomain::Chargrams { .. } => "chargrams",
                        FeatureDomain::RelevantScript { .. } => "relevant-script",
                    },
                    id_space: domain.id_space(),
                    dense_dim: domain.dense_dim(),
                })
                .collect(),
            embeddings: params
                .embeddings()
                .iter()
                .map(|table| EmbeddingSummary {
                    name: table.name.clone(),
                    rows: table.rows(),
                    dim: table.dim(),
                    combiner: match table.combiner {
                        Combiner::Sum => "sum",
                        Combiner::Mean => "mean",
                    },
                })
                .collect(),
            dense_inputs: params.dense_dim(),
            layers: params
                .layers()
                .iter()
                .map(|layer| LayerSummary {
                    input: layer.input_dim(),
                    output: layer.output_dim(),
                    activation: match layer.activation {
                        Activation::Identity => "identity",
                        Activation::Relu => "relu",
                        Activation::Tanh => "tanh",
                        Activation::Sigmoid => "sigmoid",
                    },
                })
                .collect(),
        }
    }

    /// Write a human-readable report
    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "valid: {}", self.valid)?;
        writeln!(writer, "reliability threshold: {}", self.reliability_threshold)?;
        writeln!(
            writer,
            "languages ({}): {}",
            self.languages.len(),
            self.languages.join(", ")
        )?;
        writeln!(writer, "features:")?;
        for feature in &self.features {
            writeln!(
                writer,
                "  {} ({}): {} ids, {} dense",
                feature.name, feature.kind, feature.id_space, feature.dense_dim
            )?;
        }
        writeln!(writer, "embeddings:")?;
        for table in &self.embeddings {
            writeln!(
                writer,
                "  {}: {} x {} ({})",
                table.name, table.rows, table.dim, table.combiner
            )?;
        }
        writeln!(writer, "dense inputs: {}", self.dense_inputs)?;
        writeln!(writer, "layers:")?;
        for (index, layer) in self.layers.iter().enumerate() {
            writeln!(
                writer,
                "  {index}: {} -> {} ({})",
                layer.input, layer.output, layer.activation
            )?;
        }
        Ok(())
    }
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> Result<()> {
        super::init_logging(self.verbose, false);

        let bytes = ModelBytes::open(&self.model)
            .with_context(|| format!("Failed to open model: {}", self.model.display()))?;
        let model = LanguageModel::load(&bytes)
            .map_err(|e| CliError::InvalidModel(e.to_string()))
            .with_context(|| format!("Failed to load model: {}", self.model.display()))?;

        let summary = ModelSummary::new(&model);
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        match self.format {
            OutputFormat::Text => summary.write_text(&mut writer)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &summary)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
