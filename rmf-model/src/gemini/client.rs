//! Gemini client implementation.

use async_trait::async_trait;
use rmf_core::{ChatModel, CompletionRequest, Result, RmfError};
use tracing::{debug, error};

use super::config::GeminiConfig;
use super::convert::{self, ErrorResponse, GenerateContentResponse};

const PROVIDER: &str = "Gemini";

/// Gemini chat model.
pub struct GeminiChatModel {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiChatModel {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(RmfError::model(PROVIDER, "API key must not be empty"));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RmfError::model(PROVIDER, format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create a client for `model` with the default settings.
    pub fn from_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::new(GeminiConfig::new(api_key, model))
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.config.base_url, self.config.model);
        let body = convert::to_gemini_request(&request);
        debug!(provider = PROVIDER, model = %self.config.model, turns = body.contents.len(), "generating content");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
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
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RmfError::model(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RmfError::model(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        parsed.into_text().map_err(|reason| {
            error!(provider = PROVIDER, reason = %reason, "no usable candidate");
            RmfError::model(PROVIDER, reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(GeminiChatModel::from_api_key("", "gemini-2.0-flash").is_err());
    }

    #[test]
    fn name_is_the_model() {
        let model = GeminiChatModel::from_api_key("key", "gemini-2.0-flash").unwrap();
        assert_eq!(model.name(), "gemini-2.0-flash");
    }
}
