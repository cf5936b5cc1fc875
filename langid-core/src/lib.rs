//! On-device language identification
//!
//! Given a short piece of UTF-8 text, this crate predicts which of a fixed
//! set of languages it is written in, or falls back to a configurable
//! default when the prediction is not confident enough. Everything needed
//! for inference lives in a single binary model file that is memory-mapped
//! once at construction.
//!
//! # Architecture
//!
//! Data flows strictly downward:
//! - **Tokenizer**: splits text on whitespace and script changes
//! - **Features**: hashes character n-grams of each token into bucket ids
//!   and derives dense side features
//! - **Model**: parses and validates the container, network parameters and
//!   language list
//! - **Network**: pools embeddings and runs the feed-forward layers
//! - **Classifier**: softmax plus thresholded decision, fail-soft on any
//!   load error
//!
//! # Example
//!
//! ```no_run
//! use langid_core::LanguageClassifier;
//!
//! let mut classifier = LanguageClassifier::from_path("models/langid.model");
//! classifier.set_default_language("und");
//!
//! // Never panics: an unreadable model yields the default language.
//! let code = classifier.find_language("Bonjour tout le monde");
//! println!("{code}");
//! ```

#![warn(missing_docs)]

pub mod classifier;
pub mod error;
pub mod features;
pub mod model;
pub mod network;
pub mod softmax;
pub mod tokenizer;
pub mod unicode;

pub use classifier::{ClassifierConfig, LanguageClassifier};
pub use error::{FeatureError, ModelError, Result};
pub use features::{
    DomainFeatures, FeatureDomain, FeatureDomainSpec, FeatureExtractionOptions, FeatureKind,
    FeatureVector, TokenFeatureExtractor,
};
pub use model::{LanguageModel, ModelBytes, ModelContainerBuilder, NetworkParams, TaskSpec};
pub use network::EmbeddingNetwork;
pub use softmax::{arg_max, compute_softmax};
pub use tokenizer::{Token, Tokenizer, TokenizerOptions};
