//! Ollama configuration.

use std::time::Duration;

/// Address of a locally running Ollama server.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Configuration for [`OllamaChatModel`](super::OllamaChatModel).
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub model: String,
    pub base_url: String,
    /// Local models can be slow to load, so the default is generous.
    pub timeout: Duration,
}

impl OllamaConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
