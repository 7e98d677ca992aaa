//! Exhaustive L2 index loaded from an index directory.
//!
//! The directory written by the ingestion step holds two JSON files:
//!
//! - `index.json`: `{ "dimensions": 768, "vectors": [{ "id": "...", "vector": [...] }] }`
//! - `docstore.json`: `{ "<id>": { "text": "...", "source": "...", "page": 12 } }`
//!
//! Distances are squared Euclidean, matching a flat L2 index: 0.0 is an
//! exact match and values above roughly 1.5 are usually off-topic for
//! normalized embeddings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::Chunk;
use crate::error::{RagError, Result};
use crate::vectorstore::{IndexHit, IndexLoader, VectorIndex};

const VECTORS_FILE: &str = "index.json";
const DOCSTORE_FILE: &str = "docstore.json";

#[derive(Debug, Clone)]
struct FlatEntry {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// An immutable, exhaustively searched vector index.
///
/// Entries keep insertion order, which is also the tie-break order for
/// equal distances.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimensions: usize,
    entries: Vec<FlatEntry>,
}

#[derive(Serialize, Deserialize)]
struct VectorsFile {
    dimensions: usize,
    vectors: Vec<VectorRecord>,
}

#[derive(Serialize, Deserialize)]
struct VectorRecord {
    id: String,
    vector: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct DocRecord {
    text: String,
    #[serde(default = "unknown_source")]
    source: String,
    #[serde(default)]
    page: Option<u32>,
}

fn unknown_source() -> String {
    "Unknown".to_string()
}

/// Squared Euclidean distance.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl FlatIndex {
    /// Build an index from `(chunk, vector)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if a vector has the wrong length.
    pub fn from_entries(
        dimensions: usize,
        entries: impl IntoIterator<Item = (Chunk, Vec<f32>)>,
    ) -> Result<Self> {
        let mut index = Self { dimensions, entries: Vec::new() };
        for (chunk, vector) in entries {
            if vector.len() != dimensions {
                return Err(RagError::VectorStoreError {
                    backend: "Flat".to_string(),
                    message: format!(
                        "chunk '{}' has {} dimensions, expected {dimensions}",
                        chunk.id,
                        vector.len()
                    ),
                });
            }
            index.entries.push(FlatEntry { chunk, vector });
        }
        Ok(index)
    }

    /// Load an index directory.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexUnavailable`] if the directory or either file is missing or unreadable.
    /// - [`RagError::IndexCorrupt`] if the files do not parse, vectors have the wrong
    ///   length, or a vector id has no docstore record.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let location = dir.display().to_string();

        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            return Err(RagError::IndexUnavailable {
                path: location,
                message: "index directory not found; run ingestion first".to_string(),
            });
        }

        let vectors: VectorsFile = read_json(dir, VECTORS_FILE).await?;
        let mut docstore: HashMap<String, DocRecord> = read_json(dir, DOCSTORE_FILE).await?;

        let mut entries = Vec::with_capacity(vectors.vectors.len());
        for record in vectors.vectors {
            if record.vector.len() != vectors.dimensions {
                return Err(RagError::IndexCorrupt {
                    path: location,
                    message: format!(
                        "vector '{}' has {} dimensions, expected {}",
                        record.id,
                        record.vector.len(),
                        vectors.dimensions
                    ),
                });
            }
            let Some(doc) = docstore.remove(&record.id) else {
                return Err(RagError::IndexCorrupt {
                    path: location,
                    message: format!("vector '{}' has no docstore record", record.id),
                });
            };
            if doc.text.trim().is_empty() {
                warn!(index = %location, id = %record.id, "skipping chunk with empty text");
                continue;
            }
            let chunk = Chunk { id: record.id, text: doc.text, source: doc.source, page: doc.page };
            entries.push(FlatEntry { chunk, vector: record.vector });
        }

        info!(index = %location, chunk_count = entries.len(), dimensions = vectors.dimensions, "loaded index");
        Ok(Self { dimensions: vectors.dimensions, entries })
    }

    /// Write the index in the directory layout read by [`FlatIndex::load_dir`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if the directory or files cannot be written.
    pub async fn save_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let io_error = |e: std::io::Error| RagError::VectorStoreError {
            backend: "Flat".to_string(),
            message: format!("failed to write '{}': {e}", dir.display()),
        };

        let vectors = VectorsFile {
            dimensions: self.dimensions,
            vectors: self
                .entries
                .iter()
                .map(|e| VectorRecord { id: e.chunk.id.clone(), vector: e.vector.clone() })
                .collect(),
        };
        let docstore: HashMap<&str, DocRecord> = self
            .entries
            .iter()
            .map(|e| {
                (
                    e.chunk.id.as_str(),
                    DocRecord {
                        text: e.chunk.text.clone(),
                        source: e.chunk.source.clone(),
                        page: e.chunk.page,
                    },
                )
            })
            .collect();

        let to_json = |e: serde_json::Error| RagError::VectorStoreError {
            backend: "Flat".to_string(),
            message: format!("failed to serialize index: {e}"),
        };
        tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
        tokio::fs::write(dir.join(VECTORS_FILE), serde_json::to_vec(&vectors).map_err(to_json)?)
            .await
            .map_err(io_error)?;
        tokio::fs::write(dir.join(DOCSTORE_FILE), serde_json::to_vec(&docstore).map_err(to_json)?)
            .await
            .map_err(io_error)?;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let bytes = tokio::fs::read(&path).await.map_err(|e| RagError::IndexUnavailable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| RagError::IndexCorrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl VectorIndex for FlatIndex {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    async fn search(&self, embedding: &[f32], top_n: usize) -> Result<Vec<IndexHit>> {
        if embedding.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, squared_l2(&entry.vector, embedding)))
            .collect();
        // stable: equal distances keep insertion order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(top_n);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| {
                let entry = &self.entries[i];
                IndexHit { chunk: entry.chunk.clone(), distance, embedding: entry.vector.clone() }
            })
            .collect())
    }
}

/// Loads a [`FlatIndex`] from a directory on first use.
#[derive(Debug, Clone)]
pub struct DirectoryIndexLoader {
    dir: PathBuf,
}

impl DirectoryIndexLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl IndexLoader for DirectoryIndexLoader {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    async fn load(&self) -> Result<Arc<dyn VectorIndex>> {
        let index = FlatIndex::load_dir(&self.dir).await?;
        Ok(Arc::new(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, source: &str, page: Option<u32>) -> Chunk {
        Chunk { id: id.into(), text: format!("text of {id}"), source: source.into(), page }
    }

    #[tokio::test]
    async fn search_orders_by_ascending_distance_with_stable_ties() {
        let index = FlatIndex::from_entries(
            2,
            vec![
                (chunk("far", "a", Some(1)), vec![3.0, 0.0]),
                (chunk("tie-1", "a", Some(2)), vec![0.0, 1.0]),
                (chunk("exact", "b", Some(3)), vec![1.0, 0.0]),
                (chunk("tie-2", "b", Some(4)), vec![0.0, 1.0]),
            ],
        )
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 3).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "tie-1", "tie-2"]);
        assert_eq!(hits[0].distance, 0.0);
        assert!((hits[1].distance - 2.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn search_rejects_wrong_dimensions() {
        let index = FlatIndex::from_entries(2, vec![(chunk("a", "a", None), vec![1.0, 0.0])]).unwrap();
        let err = index.search(&[1.0, 0.0, 0.0], 1).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn from_entries_rejects_wrong_vector_length() {
        let result = FlatIndex::from_entries(3, vec![(chunk("a", "a", None), vec![1.0])]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let index = FlatIndex::from_entries(
            2,
            vec![
                (chunk("c1", "nist.pdf", Some(5)), vec![1.0, 0.0]),
                (chunk("c2", "csf.pdf", None), vec![0.0, 1.0]),
            ],
        )
        .unwrap();
        index.save_dir(dir.path()).await.unwrap();

        let loaded = FlatIndex::load_dir(dir.path()).await.unwrap();
        assert_eq!(loaded.len(), 2);
        let hits = loaded.search(&[0.0, 1.0], 2).await.unwrap();
        assert_eq!(hits[0].chunk, chunk("c2", "csf.pdf", None));
        assert_eq!(hits[1].chunk.page, Some(5));
    }

    #[tokio::test]
    async fn missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlatIndex::load_dir(dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, RagError::IndexUnavailable { .. }));
        assert!(err.is_index_unavailable());
    }

    #[tokio::test]
    async fn missing_docstore_record_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(VECTORS_FILE),
            r#"{"dimensions": 2, "vectors": [{"id": "x", "vector": [1.0, 0.0]}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join(DOCSTORE_FILE), "{}").unwrap();

        let err = FlatIndex::load_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, RagError::IndexCorrupt { .. }));
    }

    #[tokio::test]
    async fn empty_text_records_are_skipped_and_source_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(VECTORS_FILE),
            r#"{"dimensions": 1, "vectors": [{"id": "blank", "vector": [1.0]}, {"id": "ok", "vector": [0.5]}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(DOCSTORE_FILE),
            r#"{"blank": {"text": "  "}, "ok": {"text": "AC-2", "page": 7}}"#,
        )
        .unwrap();

        let index = FlatIndex::load_dir(dir.path()).await.unwrap();
        assert_eq!(index.len(), 1);
        let hits = index.search(&[0.5], 1).await.unwrap();
        assert_eq!(hits[0].chunk.source, "Unknown");
        assert_eq!(hits[0].chunk.page, Some(7));
    }
}
