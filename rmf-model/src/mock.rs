//! Scriptable [`ChatModel`] for tests.
//!
//! ```rust,ignore
//! use rmf_model::{MockChatModel, MockReply};
//!
//! let model = MockChatModel::new("**AC-2** governs accounts.")
//!     .with_script([MockReply::fail("router offline")]);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rmf_core::{ChatModel, CompletionRequest, Result, RmfError};

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Text(String),
    Fail(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        MockReply::Fail(message.into())
    }
}

/// A [`ChatModel`] that replays scripted replies.
///
/// Scripted replies are consumed in order; once the script is exhausted every
/// call gets the default reply. Every request is recorded.
pub struct MockChatModel {
    name: String,
    default_reply: MockReply,
    script: Mutex<VecDeque<MockReply>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockChatModel {
    /// Always answer `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(reply.into()))
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_default(MockReply::Fail(message.into()))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            name: "mock".to_string(),
            default_reply,
            script: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue replies served before the default one.
    pub fn with_script(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.extend(replies);
        }
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of `complete` calls so far, including ones that timed out.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let reply = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.default_reply.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(RmfError::model("Mock", message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_runs_before_default_reply() {
        let model = MockChatModel::new("default")
            .with_script([MockReply::text("first"), MockReply::fail("boom")]);

        assert_eq!(model.complete(CompletionRequest::new("s")).await.unwrap(), "first");
        assert!(model.complete(CompletionRequest::new("s")).await.is_err());
        assert_eq!(model.complete(CompletionRequest::new("s")).await.unwrap(), "default");
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let model = MockChatModel::new("ok");
        model.complete(CompletionRequest::new("system").with_user("q")).await.unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system, "system");
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let model = MockChatModel::new("late").with_delay(Duration::from_secs(30));
        let start = tokio::time::Instant::now();

        model.complete(CompletionRequest::new("s")).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
