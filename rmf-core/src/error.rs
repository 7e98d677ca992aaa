//! Error types shared across the RMF assistant crates.

use thiserror::Error;

/// Request-level errors.
///
/// Non-fatal outcomes (empty knowledge base, off-topic question, classifier
/// failure) are not errors and never show up here.
#[derive(Debug, Error)]
pub enum RmfError {
    /// A generation backend could not be constructed or reached.
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Answer synthesis failed. Not retried.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Retrieval failed for a reason other than a missing index or an off-topic question.
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller supplied unusable input (for example an empty question).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RmfError {
    /// Shorthand for a [`RmfError::Model`] error.
    pub fn model(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for RMF operations.
pub type Result<T> = std::result::Result<T, RmfError>;
