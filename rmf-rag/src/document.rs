//! Data types for chunks, citations, and retrieval results.

use serde::{Deserialize, Serialize};

/// An immutable slice of a source document, as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Vector identifier inside the index.
    pub id: String,
    /// The text content of the chunk. Never empty once loaded.
    pub text: String,
    /// Source document identifier (usually the file name).
    pub source: String,
    /// Page number within the source, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Chunk {
    /// Page number for display; `?` when unknown.
    pub fn page_label(&self) -> String {
        match self.page {
            Some(page) => page.to_string(),
            None => "?".to_string(),
        }
    }
}

/// A [`Chunk`] paired with its distance from the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Distance from the query (non-negative, lower is more similar).
    pub distance: f32,
}

impl ScoredChunk {
    pub fn similarity(&self) -> f32 {
        similarity_from_distance(self.distance)
    }
}

/// Inverse distance mapping into `(0, 1]`.
pub fn similarity_from_distance(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// One entry of the `sources` list returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    pub source: String,
    pub page: Option<u32>,
    /// Leading excerpt of the chunk text, with `...` appended when cut.
    pub snippet: String,
}

/// The chunks, context, and citations for one question.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrievalResult {
    /// Surviving chunks in ranked order, at most `k`.
    pub chunks: Vec<ScoredChunk>,
    /// Labeled excerpts joined by blank lines, bounded by the context budget.
    pub context: String,
    /// Unique `(source, page)` citations in first-seen order.
    pub citations: Vec<Citation>,
}

/// Outcome of a retrieval. The two non-`Found` variants are normal results.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// At least one chunk passed the relevance guard.
    Found(RetrievalResult),
    /// Nothing passed the relevance guard.
    OutOfScope {
        /// Distance of the closest candidate, if there was one.
        closest_distance: Option<f32>,
    },
    /// The index is missing, unreadable, or holds no chunks.
    KnowledgeBaseEmpty,
}

impl Retrieval {
    /// Consume into the result, yielding an empty one for non-`Found` outcomes.
    pub fn into_result(self) -> RetrievalResult {
        match self {
            Retrieval::Found(result) => result,
            _ => RetrievalResult::default(),
        }
    }
}
