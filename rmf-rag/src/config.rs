//! Configuration for the retriever.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// How candidates are pulled from the index and narrowed to `k`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Plain nearest-neighbour top-k over `max(k, min_candidates)` candidates.
    Similarity {
        /// Lower bound on the number of candidates fetched.
        min_candidates: usize,
    },
    /// Maximal marginal relevance over a pool of `max(fetch_k, k)` candidates.
    Mmr {
        /// Size of the candidate pool.
        fetch_k: usize,
        /// Trade-off between relevance (1.0) and diversity (0.0).
        lambda: f32,
    },
}

impl Default for SearchStrategy {
    fn default() -> Self {
        SearchStrategy::Mmr { fetch_k: 20, lambda: 0.5 }
    }
}

/// The rule deciding whether candidates are close enough to the question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelevancePolicy {
    /// Reject the whole query when the closest candidate is farther than `max_distance`.
    GlobalGate {
        /// Distance ceiling for the single closest candidate.
        max_distance: f32,
    },
    /// Drop each candidate whose `1 / (1 + distance)` is below `min_similarity`.
    PerChunk {
        /// Similarity floor in `[0, 1]`.
        min_similarity: f32,
    },
}

impl Default for RelevancePolicy {
    fn default() -> Self {
        // Flat L2 distance: 0 is identical, around 1.0 related, above 1.5 off-topic.
        RelevancePolicy::GlobalGate { max_distance: 1.5 }
    }
}

/// Configuration parameters for the [`Retriever`](crate::Retriever).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of chunks kept after selection.
    pub top_k: usize,
    /// Candidate fetch and selection strategy.
    pub strategy: SearchStrategy,
    /// Relevance guard.
    pub relevance: RelevancePolicy,
    /// Maximum length of the assembled context, in characters.
    pub context_budget: usize,
    /// Maximum length of a citation snippet before the `...` marker, in characters.
    pub snippet_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            strategy: SearchStrategy::default(),
            relevance: RelevancePolicy::default(),
            context_budget: 6000,
            snippet_chars: 200,
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }

    /// Number of candidates to request from the index for a given `k`.
    pub fn candidate_pool(&self, k: usize) -> usize {
        match self.strategy {
            SearchStrategy::Similarity { min_candidates } => k.max(min_candidates),
            SearchStrategy::Mmr { fetch_k, .. } => k.max(fetch_k),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if let SearchStrategy::Mmr { fetch_k, lambda } = self.strategy {
            if fetch_k < self.top_k {
                return Err(RagError::ConfigError(format!(
                    "fetch_k ({fetch_k}) must be at least top_k ({})",
                    self.top_k
                )));
            }
            if !(0.0..=1.0).contains(&lambda) {
                return Err(RagError::ConfigError(format!(
                    "mmr lambda ({lambda}) must be within [0, 1]"
                )));
            }
        }
        match self.relevance {
            RelevancePolicy::GlobalGate { max_distance } => {
                if !max_distance.is_finite() || max_distance < 0.0 {
                    return Err(RagError::ConfigError(format!(
                        "max_distance ({max_distance}) must be a non-negative number"
                    )));
                }
            }
            RelevancePolicy::PerChunk { min_similarity } => {
                if !(0.0..=1.0).contains(&min_similarity) {
                    return Err(RagError::ConfigError(format!(
                        "min_similarity ({min_similarity}) must be within [0, 1]"
                    )));
                }
            }
        }
        if self.context_budget == 0 {
            return Err(RagError::ConfigError(
                "context_budget must be greater than zero".to_string(),
            ));
        }
        if self.snippet_chars == 0 {
            return Err(RagError::ConfigError(
                "snippet_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the number of chunks kept after selection.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the candidate fetch strategy.
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Use maximal marginal relevance over `fetch_k` candidates.
    pub fn mmr(self, fetch_k: usize, lambda: f32) -> Self {
        self.strategy(SearchStrategy::Mmr { fetch_k, lambda })
    }

    /// Use plain similarity ranking over at least `min_candidates` candidates.
    pub fn similarity(self, min_candidates: usize) -> Self {
        self.strategy(SearchStrategy::Similarity { min_candidates })
    }

    /// Set the relevance guard.
    pub fn relevance(mut self, policy: RelevancePolicy) -> Self {
        self.config.relevance = policy;
        self
    }

    /// Set the context budget in characters.
    pub fn context_budget(mut self, chars: usize) -> Self {
        self.config.context_budget = chars;
        self
    }

    /// Set the citation snippet length in characters.
    pub fn snippet_chars(mut self, chars: usize) -> Self {
        self.config.snippet_chars = chars;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `top_k == 0`
    /// - MMR `fetch_k < top_k` or `lambda` outside `[0, 1]`
    /// - the relevance threshold is negative, non-finite, or out of range
    /// - `context_budget == 0` or `snippet_chars == 0`
    pub fn build(self) -> Result<RetrievalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_mmr_gate_setup() {
        let config = RetrievalConfig::builder().build().unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.strategy, SearchStrategy::Mmr { fetch_k: 20, lambda: 0.5 });
        assert_eq!(config.relevance, RelevancePolicy::GlobalGate { max_distance: 1.5 });
        assert_eq!(config.context_budget, 6000);
        assert_eq!(config.candidate_pool(5), 20);
        assert_eq!(config.candidate_pool(30), 30);
    }

    #[test]
    fn similarity_pool_is_at_least_min_candidates() {
        let config = RetrievalConfig::builder().top_k(3).similarity(8).build().unwrap();
        assert_eq!(config.candidate_pool(3), 8);
        assert_eq!(config.candidate_pool(12), 12);
    }

    #[test]
    fn rejects_inconsistent_values() {
        assert!(RetrievalConfig::builder().top_k(0).build().is_err());
        assert!(RetrievalConfig::builder().top_k(10).mmr(5, 0.5).build().is_err());
        assert!(RetrievalConfig::builder().mmr(20, 1.5).build().is_err());
        assert!(
            RetrievalConfig::builder()
                .relevance(RelevancePolicy::GlobalGate { max_distance: -1.0 })
                .build()
                .is_err()
        );
        assert!(
            RetrievalConfig::builder()
                .relevance(RelevancePolicy::PerChunk { min_similarity: 2.0 })
                .build()
                .is_err()
        );
        assert!(RetrievalConfig::builder().context_budget(0).build().is_err());
    }

    #[test]
    fn policies_round_trip_through_serde() {
        let config = RetrievalConfig::builder()
            .relevance(RelevancePolicy::PerChunk { min_similarity: 0.4 })
            .build()
            .unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["relevance"]["kind"], "per_chunk");
        let back: RetrievalConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
