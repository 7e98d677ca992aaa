//! Gemini configuration.

use std::time::Duration;

/// The public Generative Language API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for [`GeminiChatModel`](super::GeminiChatModel).
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model name without the `models/` prefix, e.g. `gemini-2.0-flash`.
    pub model: String,
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let model = model.strip_prefix("models/").map(str::to_string).unwrap_or(model);
        Self {
            api_key: api_key.into(),
            model,
            base_url: GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_prefix_is_stripped() {
        let config = GeminiConfig::new("key", "models/gemini-2.0-flash");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, GEMINI_API_BASE);
    }
}
