//! # rmf-rag
//!
//! The retrieval engine of the RMF assistant. A question is embedded, matched
//! against a persisted nearest-neighbour index, passed through a relevance
//! guard, optionally diversified with maximal marginal relevance, and turned
//! into a bounded context string plus a deduplicated citation list.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rmf_rag::{DirectoryIndexLoader, RetrievalConfig, Retriever, Retrieval};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .index_loader(Arc::new(DirectoryIndexLoader::new("index_kms")))
//!     .build()?;
//!
//! match retriever.retrieve("What is AC-2?").await? {
//!     Retrieval::Found(result) => println!("{}", result.context),
//!     Retrieval::OutOfScope { .. } => println!("off-topic"),
//!     Retrieval::KnowledgeBaseEmpty => println!("run ingestion first"),
//! }
//! ```

pub mod config;
pub mod context;
pub mod document;
pub mod embedding;
pub mod error;
pub mod flat;
pub mod mmr;
pub mod retriever;
pub mod vectorstore;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "ollama")]
pub mod ollama;

pub use config::{RelevancePolicy, RetrievalConfig, RetrievalConfigBuilder, SearchStrategy};
pub use context::{assemble_context, collect_citations, format_label};
pub use document::{
    Chunk, Citation, Retrieval, RetrievalResult, ScoredChunk, similarity_from_distance,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use flat::{DirectoryIndexLoader, FlatIndex};
pub use retriever::{Retriever, RetrieverBuilder};
pub use vectorstore::{IndexHit, IndexLoader, VectorIndex};

#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbeddingProvider;
#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbeddingProvider;
