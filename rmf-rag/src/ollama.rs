//! Ollama embedding provider using the local `/api/embed` endpoint.
//!
//! This module is only available when the `ollama` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Ollama server address.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// The default model.
const DEFAULT_MODEL: &str = "llama3";

/// An [`EmbeddingProvider`] backed by a local Ollama server.
///
/// # Example
///
/// ```rust,ignore
/// use rmf_rag::ollama::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new("nomic-embed-text");
/// let embedding = provider.embed("What is AC-2?").await?;
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl OllamaEmbeddingProvider {
    /// Create a provider for `model` on the default local server.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_OLLAMA_URL.into(),
            model: model.into(),
        }
    }

    /// Override the server address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Ollama", model = %self.model, text_len = text.len(), "embedding query");

        let request_body = EmbedRequest { model: &self.model, input: text };
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Ollama", error = %e, "request failed");
                RagError::EmbeddingError {
                    provider: "Ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = "Ollama", %status, "API error");
            return Err(RagError::EmbeddingError {
                provider: "Ollama".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse response");
            RagError::EmbeddingError {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        embed_response.embeddings.into_iter().next().ok_or_else(|| RagError::EmbeddingError {
            provider: "Ollama".into(),
            message: "API returned empty response".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OllamaEmbeddingProvider::default().with_base_url("http://gpu-box:11434/");
        assert_eq!(provider.base_url, "http://gpu-box:11434");
        assert_eq!(provider.model(), "llama3");
    }

    #[test]
    fn parses_embed_response() {
        let response: EmbedResponse =
            serde_json::from_str(r#"{"model": "llama3", "embeddings": [[0.5, 0.25]]}"#).unwrap();
        assert_eq!(response.embeddings, vec![vec![0.5, 0.25]]);
    }

    #[test]
    fn request_sends_a_single_input() {
        let value =
            serde_json::to_value(EmbedRequest { model: "llama3", input: "AC-2" }).unwrap();
        assert_eq!(value, serde_json::json!({"model": "llama3", "input": "AC-2"}));
    }
}
