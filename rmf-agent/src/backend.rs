//! Provider selection, resolved once at startup.

use std::sync::Arc;

use rmf_core::{ChatModel, Result};
use rmf_model::{GeminiChatModel, GeminiConfig, OllamaChatModel, OllamaConfig};
use rmf_rag::{EmbeddingProvider, GeminiEmbeddingProvider, OllamaEmbeddingProvider};
use tracing::info;

use crate::settings::Settings;

/// Which provider family serves chat and embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    Ollama,
}

impl BackendKind {
    /// Gemini when an API key is configured, Ollama otherwise.
    pub fn select(settings: &Settings) -> Self {
        if settings.gemini_api_key.is_some() { BackendKind::Gemini } else { BackendKind::Ollama }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::Ollama => "ollama",
        }
    }
}

/// A chat model and an embedding provider from the same provider family.
///
/// Both handles are shared read-only by every request.
#[derive(Clone)]
pub struct Backend {
    kind: BackendKind,
    chat: Arc<dyn ChatModel>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl Backend {
    /// Assemble a backend from parts, e.g. test doubles.
    pub fn new(
        kind: BackendKind,
        chat: Arc<dyn ChatModel>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self { kind, chat, embeddings }
    }

    /// Build the clients selected by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`RmfError::Model`](rmf_core::RmfError::Model) if an HTTP
    /// client cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = match &settings.gemini_api_key {
            Some(api_key) => {
                let chat = GeminiChatModel::new(GeminiConfig::new(
                    api_key.as_str(),
                    settings.gemini_model.as_str(),
                ))?;
                let embeddings = GeminiEmbeddingProvider::new(api_key.as_str())?
                    .with_model(settings.gemini_embedding_model.as_str());
                Self::new(BackendKind::Gemini, Arc::new(chat), Arc::new(embeddings))
            }
            None => {
                let chat = OllamaChatModel::new(
                    OllamaConfig::new(settings.ollama_model.as_str())
                        .with_base_url(settings.ollama_base_url.as_str()),
                )?;
                let embeddings =
                    OllamaEmbeddingProvider::new(settings.ollama_embedding_model.as_str())
                        .with_base_url(settings.ollama_base_url.as_str());
                Self::new(BackendKind::Ollama, Arc::new(chat), Arc::new(embeddings))
            }
        };

        info!(backend = backend.name(), chat_model = backend.chat.name(), "backend selected");
        Ok(backend)
    }

    /// `"gemini"` or `"ollama"`.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn chat(&self) -> Arc<dyn ChatModel> {
        Arc::clone(&self.chat)
    }

    pub fn embeddings(&self) -> Arc<dyn EmbeddingProvider> {
        Arc::clone(&self.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_selects_gemini() {
        let settings = Settings { gemini_api_key: Some("key".into()), ..Settings::default() };
        let backend = Backend::from_settings(&settings).unwrap();
        assert_eq!(backend.name(), "gemini");
        assert_eq!(backend.chat().name(), "gemini-2.0-flash");
    }

    #[test]
    fn no_api_key_selects_ollama() {
        let backend = Backend::from_settings(&Settings::default()).unwrap();
        assert_eq!(backend.kind(), BackendKind::Ollama);
        assert_eq!(backend.name(), "ollama");
        assert_eq!(backend.chat().name(), "llama3");
    }
}
