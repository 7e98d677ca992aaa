//! Embedding provider trait for turning text into query vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends (Gemini, Ollama, ...)
/// behind a unified async interface. The provider used at query time must be
/// the one the index was built with, otherwise distances are meaningless.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
