//! Process configuration read from the environment.
//!
//! The binary loads `.env` with `dotenvy` before calling [`Settings::from_env`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rmf_core::{Result, RmfError};
use rmf_rag::{RelevancePolicy, RetrievalConfig};

use crate::generation::DEFAULT_GENERATION_TEMPERATURE;
use crate::router::DEFAULT_ROUTER_TIMEOUT;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_EMBEDDING_MODEL: &str = "models/gemini-embedding-001";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_INDEX_PATH: &str = "index_kms";

/// Everything the orchestrator needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Selects Gemini for chat and embeddings when present.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_embedding_model: String,
    pub ollama_model: String,
    pub ollama_embedding_model: String,
    pub ollama_base_url: String,
    pub index_path: PathBuf,
    pub top_k: usize,
    pub fetch_k: usize,
    /// Global-gate distance ceiling.
    pub relevance_ceiling: f32,
    pub context_budget: usize,
    pub router_timeout: Duration,
    pub generation_temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_embedding_model: DEFAULT_GEMINI_EMBEDDING_MODEL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_embedding_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_base_url: DEFAULT_OLLAMA_URL.to_string(),
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            top_k: 5,
            fetch_k: 20,
            relevance_ceiling: 1.5,
            context_budget: 6000,
            router_timeout: DEFAULT_ROUTER_TIMEOUT,
            generation_temperature: DEFAULT_GENERATION_TEMPERATURE,
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`RmfError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let ollama_model = get("OLLAMA_MODEL").unwrap_or(defaults.ollama_model);
        let ollama_embedding_model =
            get("OLLAMA_EMBEDDING_MODEL").unwrap_or_else(|| ollama_model.clone());

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_embedding_model: get("GEMINI_EMBEDDING_MODEL")
                .unwrap_or(defaults.gemini_embedding_model),
            ollama_model,
            ollama_embedding_model,
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            index_path: get("RMF_INDEX_PATH").map(PathBuf::from).unwrap_or(defaults.index_path),
            top_k: parse(&get, "RMF_TOP_K", defaults.top_k)?,
            fetch_k: parse(&get, "RMF_FETCH_K", defaults.fetch_k)?,
            relevance_ceiling: parse(&get, "RMF_RELEVANCE_CEILING", defaults.relevance_ceiling)?,
            context_budget: parse(&get, "RMF_CONTEXT_BUDGET", defaults.context_budget)?,
            router_timeout: Duration::from_secs(parse(
                &get,
                "RMF_ROUTER_TIMEOUT_SECS",
                defaults.router_timeout.as_secs(),
            )?),
            generation_temperature: parse(
                &get,
                "RMF_GENERATION_TEMPERATURE",
                defaults.generation_temperature,
            )?,
        })
    }

    /// Retrieval configuration: MMR over `fetch_k` candidates behind a global gate.
    ///
    /// # Errors
    ///
    /// Returns [`RmfError::Config`] if the values are inconsistent (for
    /// example `fetch_k < top_k`).
    pub fn retrieval_config(&self) -> Result<RetrievalConfig> {
        let config = RetrievalConfig::builder()
            .top_k(self.top_k)
            .mmr(self.fetch_k, 0.5)
            .relevance(RelevancePolicy::GlobalGate { max_distance: self.relevance_ceiling })
            .context_budget(self.context_budget)
            .build()?;
        Ok(config)
    }
}

fn parse<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| RmfError::Config(format!("{key}={raw:?} is not valid: {e}"))),
        None => Ok(default),
    }
}
