//! The generation backend capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::history::Turn;

/// A single chat-completion request: a system instruction followed by turns.
///
/// The last turn is normally the user's question. Turns are sent in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub turns: Vec<Turn>,
    /// Sampling temperature; the backend default applies when unset.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>) -> Self {
        Self { system: system.into(), turns: Vec::new(), temperature: None }
    }

    pub fn with_turns(mut self, turns: impl IntoIterator<Item = Turn>) -> Self {
        self.turns.extend(turns);
        self
    }

    pub fn with_user(mut self, text: impl Into<String>) -> Self {
        self.turns.push(Turn::User(text.into()));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A chat-completion backend (Gemini, Ollama, a test double, ...).
///
/// Implementations are constructed once and shared read-only across
/// concurrent requests, so they must be `Send + Sync`. The returned text is
/// passed through to the caller unmodified.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, used in logs.
    fn name(&self) -> &str;

    /// Complete one chat turn.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl ChatModel for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            Ok(request.turns.last().map(|t| t.text().to_string()).unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn question_follows_prior_turns() {
        let request = CompletionRequest::new("system")
            .with_turns([Turn::User("hi".into()), Turn::Assistant("hello".into())])
            .with_user("What is AC-2?")
            .with_temperature(0.2);

        assert_eq!(request.turns.len(), 3);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(Echo.complete(request).await.unwrap(), "What is AC-2?");
    }
}
