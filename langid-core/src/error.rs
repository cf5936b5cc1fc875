//! Layered error types
//!
//! Load failures never escape [`crate::LanguageClassifier`]: they are logged
//! once and collapse into an invalid classifier. They are still modelled as
//! precise errors so that [`crate::LanguageModel::load`] can report why a
//! model file was rejected.

use thiserror::Error;

/// Errors in feature extraction options or in the wiring between feature
/// domains and embedding tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Hashing into zero buckets is undefined
    #[error("number of hash buckets must be greater than 0")]
    ZeroBuckets,

    /// No n-gram orders configured
    #[error("at least one character n-gram order is required")]
    NoChargramOrders,

    /// An n-gram order of zero
    #[error("invalid character n-gram order {0}")]
    InvalidChargramOrder(usize),

    /// Options of a named feature domain are invalid
    #[error("feature domain '{domain}': {source}")]
    InvalidDomain {
        /// Name of the feature domain
        domain: String,
        /// What is wrong with its options
        #[source]
        source: Box<FeatureError>,
    },

    /// A domain refers to an embedding table the network does not have
    #[error("feature domain '{domain}' has no embedding table")]
    UnknownEmbedding {
        /// Name of the feature domain
        domain: String,
    },

    /// An embedding table that no domain feeds
    #[error("embedding table '{name}' is not fed by any feature domain")]
    UnusedEmbedding {
        /// Name of the embedding table
        name: String,
    },

    /// Two domains share a name
    #[error("feature domain '{domain}' is declared more than once")]
    DuplicateDomain {
        /// Name of the feature domain
        domain: String,
    },

    /// A domain emits ids beyond the rows of its table
    #[error("feature domain '{domain}' emits ids up to {id_space} but its table has {rows} rows")]
    IdSpaceExceedsTable {
        /// Name of the feature domain
        domain: String,
        /// Number of distinct ids the domain can emit
        id_space: usize,
        /// Rows in the embedding table
        rows: usize,
    },

    /// Dense features do not match the network's dense input
    #[error("feature domains produce {actual} dense values but the network expects {expected}")]
    DenseDimensionMismatch {
        /// Dense input size declared by the network
        expected: usize,
        /// Sum of the dense widths of all domains
        actual: usize,
    },

    /// Features were computed for a different number of domains than the
    /// network has embedding tables
    #[error("got features for {actual} domains, the network has {expected} embedding tables")]
    DomainCountMismatch {
        /// Number of embedding tables
        expected: usize,
        /// Number of domains passed in
        actual: usize,
    },
}

/// Errors raised while loading a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The byte source could not be opened or mapped
    #[error("unable to read model bytes: {0}")]
    Io(#[from] std::io::Error),

    /// The outer container is malformed
    #[error("malformed model container: {0}")]
    MalformedContainer(String),

    /// The task spec inside the container is not valid TOML or has the
    /// wrong shape
    #[error("invalid task spec: {0}")]
    TaskSpec(#[from] toml::de::Error),

    /// A required named input is not declared
    #[error("no task input named '{name}'")]
    MissingInput {
        /// Name of the input
        name: String,
    },

    /// A named input does not have exactly one part
    #[error("task input '{name}' has {parts} parts, expected 1")]
    WrongPartCount {
        /// Name of the input
        name: String,
        /// Number of declared parts
        parts: usize,
    },

    /// A named input points at a file that is not in the container
    #[error("task input '{name}' refers to missing file '{file}'")]
    MissingFile {
        /// Name of the input
        name: String,
        /// File referenced by the input's part
        file: String,
    },

    /// A required parameter is absent or has the wrong type
    #[error("parameter '{0}' is missing or not a number")]
    MissingParameter(String),

    /// The network parameters blob is malformed
    #[error("malformed network parameters: {0}")]
    MalformedNetwork(String),

    /// Adjacent layers disagree on their shared dimension
    #[error("layer {layer} expects input dimension {expected}, got {actual}")]
    DimensionMismatch {
        /// Index of the offending layer
        layer: usize,
        /// Dimension the previous stage produces
        expected: usize,
        /// Input dimension declared by the layer
        actual: usize,
    },

    /// The language list is malformed
    #[error("malformed language list: {0}")]
    MalformedLanguageList(String),

    /// Language count differs from the network's output dimension
    #[error("model lists {languages} languages but the final layer has {outputs} outputs")]
    LanguageCountMismatch {
        /// Entries in the language list
        languages: usize,
        /// Output dimension of the final layer
        outputs: usize,
    },

    /// Feature domains cannot be wired to the network
    #[error("feature configuration error: {0}")]
    Feature(#[from] FeatureError),
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
