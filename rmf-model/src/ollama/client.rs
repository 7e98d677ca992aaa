//! Ollama client implementation.

use async_trait::async_trait;
use rmf_core::{ChatModel, CompletionRequest, Result, RmfError};
use tracing::{debug, error};

use super::config::OllamaConfig;
use super::convert::{self, ChatResponse, ErrorResponse};

const PROVIDER: &str = "Ollama";

/// Chat model served by a local Ollama instance.
pub struct OllamaChatModel {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaChatModel {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RmfError::model(PROVIDER, format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = convert::to_chat_request(&self.config.model, &request);
        debug!(provider = PROVIDER, model = %self.config.model, messages = body.messages.len(), "sending chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                RmfError::model(PROVIDER, format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RmfError::model(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RmfError::model(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        Ok(parsed.message.content)
    }
}
