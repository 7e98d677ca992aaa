//! Error types for the `rmf-rag` crate.

use rmf_core::RmfError;
use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The persisted index does not exist or cannot be read.
    #[error("Index unavailable at '{path}': {message}")]
    IndexUnavailable {
        /// The index location that was tried.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The persisted index exists but its contents are inconsistent.
    #[error("Index corrupt at '{path}': {message}")]
    IndexCorrupt {
        /// The index location that was tried.
        path: String,
        /// A description of the inconsistency.
        message: String,
    },

    /// The query embedding does not match the index dimensionality.
    #[error("Embedding dimension mismatch: index has {expected}, query has {actual}")]
    DimensionMismatch {
        /// Dimensionality of the index.
        expected: usize,
        /// Dimensionality of the query embedding.
        actual: usize,
    },

    /// An error occurred in the vector index backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error propagated from `rmf-core`.
    #[error(transparent)]
    Core(#[from] RmfError),
}

impl RagError {
    /// Whether this error means "there is no usable knowledge base".
    pub fn is_index_unavailable(&self) -> bool {
        matches!(self, RagError::IndexUnavailable { .. } | RagError::IndexCorrupt { .. })
    }
}

impl From<RagError> for RmfError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Core(inner) => inner,
            RagError::ConfigError(message) => RmfError::Config(message),
            other => RmfError::Retrieval(other.to_string()),
        }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
