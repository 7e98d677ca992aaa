//! Vector index traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::Chunk;
use crate::error::Result;

/// A candidate returned by a [`VectorIndex`] search.
///
/// The stored vector travels with the hit so callers can re-rank the pool
/// (maximal marginal relevance) without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub chunk: Chunk,
    /// Distance from the query, lower is closer.
    pub distance: f32,
    pub embedding: Vec<f32>,
}

/// A read-only nearest-neighbour index over embedded chunks.
///
/// Implementations are shared across concurrent requests and must not
/// require mutation to answer queries.
///
/// # Example
///
/// ```rust,ignore
/// use rmf_rag::{FlatIndex, VectorIndex};
///
/// let index = FlatIndex::load_dir("index_kms").await?;
/// let hits = index.search(&query_embedding, 20).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Dimensionality of the stored vectors.
    fn dimensions(&self) -> usize;

    /// Number of stored chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return up to `top_n` hits ordered by ascending distance.
    ///
    /// Ties keep index order so identical queries yield identical results.
    async fn search(&self, embedding: &[f32], top_n: usize) -> Result<Vec<IndexHit>>;
}

/// Produces a [`VectorIndex`] on first use.
#[async_trait]
pub trait IndexLoader: Send + Sync {
    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    /// Load the index. Missing or unreadable indexes yield
    /// [`RagError::IndexUnavailable`](crate::RagError::IndexUnavailable) or
    /// [`RagError::IndexCorrupt`](crate::RagError::IndexCorrupt).
    async fn load(&self) -> Result<Arc<dyn VectorIndex>>;
}
