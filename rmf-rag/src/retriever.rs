//! Relevance-guarded retrieval over a lazily loaded index.
//!
//! The [`Retriever`] composes an [`EmbeddingProvider`] with an
//! [`IndexLoader`]. The index is loaded on first use and shared read-only
//! afterwards; a failed load is not cached, so a later request retries it.
//!
//! # Example
//!
//! ```rust,ignore
//! use rmf_rag::{DirectoryIndexLoader, RetrievalConfig, Retriever};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .index_loader(Arc::new(DirectoryIndexLoader::new("index_kms")))
//!     .build()?;
//!
//! let retrieval = retriever.retrieve("What evidence satisfies AC-2?").await?;
//! ```

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::config::{RelevancePolicy, RetrievalConfig, SearchStrategy};
use crate::context::{assemble_context, collect_citations};
use crate::document::{Retrieval, RetrievalResult, ScoredChunk, similarity_from_distance};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::mmr::maximal_marginal_relevance;
use crate::vectorstore::{IndexHit, IndexLoader, VectorIndex};

/// Number of question characters echoed in off-topic log lines.
const LOGGED_QUESTION_CHARS: usize = 80;

/// The retrieval engine.
///
/// Holds no per-request state; a single instance is shared across
/// concurrent requests. Construct one via [`Retriever::builder()`].
pub struct Retriever {
    config: RetrievalConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    loader: Arc<dyn IndexLoader>,
    index: OnceCell<Arc<dyn VectorIndex>>,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the retrieval configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Whether the index has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.index.initialized()
    }

    /// Number of indexed chunks, loading the index if needed.
    ///
    /// Returns `None` when the index cannot be loaded.
    pub async fn indexed_chunks(&self) -> Option<usize> {
        self.index().await.ok().map(|index| index.len())
    }

    /// Retrieve with the configured `top_k`.
    pub async fn retrieve(&self, question: &str) -> Result<Retrieval> {
        self.retrieve_with_k(question, self.config.top_k).await
    }

    /// Retrieve at most `k` chunks for `question`.
    ///
    /// A missing, corrupt, or empty index yields
    /// [`Retrieval::KnowledgeBaseEmpty`]; a question the relevance guard
    /// rejects yields [`Retrieval::OutOfScope`]. Both are normal results.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] when `k` is zero,
    /// [`RagError::EmbeddingError`] when the query cannot be embedded, and
    /// [`RagError::DimensionMismatch`] when the embedder and index disagree.
    pub async fn retrieve_with_k(&self, question: &str, k: usize) -> Result<Retrieval> {
        if k == 0 {
            return Err(RagError::ConfigError("k must be at least 1".to_string()));
        }

        // 1. Load the index
        let index = match self.index().await {
            Ok(index) => index,
            Err(e) if e.is_index_unavailable() => {
                warn!(index = %self.loader.location(), error = %e, "knowledge base unavailable");
                return Ok(Retrieval::KnowledgeBaseEmpty);
            }
            Err(e) => return Err(e),
        };
        if index.is_empty() {
            warn!(index = %self.loader.location(), "knowledge base has no chunks");
            return Ok(Retrieval::KnowledgeBaseEmpty);
        }

        // 2. Embed the question
        let query_embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;
        if query_embedding.len() != index.dimensions() {
            error!(
                expected = index.dimensions(),
                actual = query_embedding.len(),
                "query embedding does not match index"
            );
            return Err(RagError::DimensionMismatch {
                expected: index.dimensions(),
                actual: query_embedding.len(),
            });
        }

        // 3. Over-fetch candidates
        let pool = self.config.candidate_pool(k);
        let hits = index.search(&query_embedding, pool).await?;
        debug!(pool, candidates = hits.len(), "fetched candidates");
        let Some(closest) = hits.first().map(|hit| hit.distance) else {
            return Ok(Retrieval::OutOfScope { closest_distance: None });
        };

        // 4. Relevance guard
        let hits = match self.config.relevance {
            RelevancePolicy::GlobalGate { max_distance } => {
                // NaN never passes the gate
                if closest.is_nan() || closest > max_distance {
                    info!(
                        distance = closest,
                        ceiling = max_distance,
                        question = %preview(question),
                        "question is out of scope"
                    );
                    return Ok(Retrieval::OutOfScope { closest_distance: Some(closest) });
                }
                hits
            }
            RelevancePolicy::PerChunk { min_similarity } => {
                let kept: Vec<IndexHit> = hits
                    .into_iter()
                    .filter(|hit| similarity_from_distance(hit.distance) >= min_similarity)
                    .collect();
                if kept.is_empty() {
                    info!(
                        distance = closest,
                        min_similarity,
                        question = %preview(question),
                        "no chunk passed the similarity floor"
                    );
                    return Ok(Retrieval::OutOfScope { closest_distance: Some(closest) });
                }
                kept
            }
        };

        // 5. Select at most k
        let chunks = self.select(&query_embedding, hits, k);

        // 6. Assemble context and citations
        let context = assemble_context(&chunks, self.config.context_budget);
        let citations = collect_citations(&chunks, self.config.snippet_chars);

        info!(
            chunk_count = chunks.len(),
            citation_count = citations.len(),
            context_chars = context.chars().count(),
            closest_distance = closest,
            "retrieval completed"
        );

        Ok(Retrieval::Found(RetrievalResult { chunks, context, citations }))
    }

    fn select(&self, query: &[f32], hits: Vec<IndexHit>, k: usize) -> Vec<ScoredChunk> {
        match self.config.strategy {
            SearchStrategy::Similarity { .. } => hits
                .into_iter()
                .take(k)
                .map(|hit| ScoredChunk { chunk: hit.chunk, distance: hit.distance })
                .collect(),
            SearchStrategy::Mmr { lambda, .. } => {
                let vectors: Vec<&[f32]> = hits.iter().map(|hit| hit.embedding.as_slice()).collect();
                let order = maximal_marginal_relevance(query, &vectors, k, lambda);
                order
                    .into_iter()
                    .map(|i| ScoredChunk { chunk: hits[i].chunk.clone(), distance: hits[i].distance })
                    .collect()
            }
        }
    }

    async fn index(&self) -> Result<&Arc<dyn VectorIndex>> {
        self.index
            .get_or_try_init(|| async {
                let index = self.loader.load().await?;
                info!(
                    index = %self.loader.location(),
                    chunks = index.len(),
                    dimensions = index.dimensions(),
                    "index ready"
                );
                Ok::<_, RagError>(index)
            })
            .await
    }
}

fn preview(question: &str) -> String {
    question.chars().take(LOGGED_QUESTION_CHARS).collect()
}

/// Builder for constructing a [`Retriever`].
///
/// The embedding provider and index loader are required. The configuration
/// defaults to [`RetrievalConfig::default()`].
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrievalConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    loader: Option<Arc<dyn IndexLoader>>,
}

impl RetrieverBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used for queries.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the loader that produces the index on first use.
    pub fn index_loader(mut self, loader: Arc<dyn IndexLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the [`Retriever`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing.
    pub fn build(self) -> Result<Retriever> {
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            RagError::ConfigError("embedding_provider is required".to_string())
        })?;
        let loader = self
            .loader
            .ok_or_else(|| RagError::ConfigError("index_loader is required".to_string()))?;

        Ok(Retriever {
            config: self.config.unwrap_or_default(),
            embedding_provider,
            loader,
            index: OnceCell::new(),
        })
    }
}
