//! Error types for merkle_digest

use thiserror::Error;

/// Main error type for tree construction, proof generation and proof rebuilding
#[derive(Error, Debug)]
pub enum MerkleError {
    /// Configuration errors
    #[error("Unsupported digest algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    #[error("Digest algorithm {name} is banned for merkle hashing")]
    BannedAlgorithm { name: String },

    #[error("Unknown hash digest provider: {name}")]
    UnknownVariant { name: String },

    #[error("{variant} requires the '{key}' option")]
    MissingOption { variant: String, key: String },

    #[error("Invalid value for option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    /// Argument errors
    #[error("Proof requires at least one leaf index")]
    EmptyLeafIndices,

    #[error("Leaf index {index} out of range for tree with {leaf_count} leaves")]
    LeafIndexOutOfRange { index: usize, leaf_count: usize },

    #[error("{variant} does not support size proofs")]
    SizeProofUnsupported { variant: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Structural failure while replaying a proof
    #[error("Merkle proof rebuild failed: {reason}")]
    RebuildFailure { reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Hex encoding/decoding errors
    #[error("Hex encoding error: {0}")]
    HexError(#[from] hex::FromHexError),
}

impl MerkleError {
    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Create a new missing option error
    pub fn missing_option(variant: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingOption {
            variant: variant.into(),
            key: key.into(),
        }
    }

    /// Create a new invalid option error
    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a new rebuild failure error
    pub fn rebuild_failure(reason: impl Into<String>) -> Self {
        Self::RebuildFailure {
            reason: reason.into(),
        }
    }

    /// Whether this error was raised while building a digest provider
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlgorithm { .. }
                | Self::BannedAlgorithm { .. }
                | Self::UnknownVariant { .. }
                | Self::MissingOption { .. }
                | Self::InvalidOption { .. }
                | Self::ConfigurationError { .. }
        )
    }

    /// Whether this error reports a caller mistake in a tree or proof request
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::EmptyLeafIndices
                | Self::LeafIndexOutOfRange { .. }
                | Self::SizeProofUnsupported { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Whether this error reports a malformed proof
    pub fn is_rebuild_failure(&self) -> bool {
        matches!(self, Self::RebuildFailure { .. })
    }
}

/// Result type alias for merkle operations
pub type Result<T> = std::result::Result<T, MerkleError>;
