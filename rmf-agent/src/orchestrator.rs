//! Composition root: route → retrieve → generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use rmf_agent::{Orchestrator, Settings};
//! use rmf_core::History;
//!
//! let orchestrator = Orchestrator::from_settings(&Settings::from_env()?)?;
//! let response = orchestrator.route_and_answer("What evidence does AU-6 need?", &History::new()).await?;
//! println!("{} ({})", response.answer, response.persona_name);
//! ```

use std::sync::Arc;
use std::time::Duration;

use rmf_core::{ChatModel, History, Result, RmfError};
use rmf_rag::{Citation, DirectoryIndexLoader, Retrieval, Retriever};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::backend::Backend;
use crate::generation::{DEFAULT_GENERATION_TEMPERATURE, Generator};
use crate::persona::{PersonaCatalog, PersonaId};
use crate::prompt::{
    DEFAULT_INSTRUCTION, KNOWLEDGE_BASE_EMPTY_ANSWER, OUT_OF_SCOPE_ANSWER, render_instruction,
};
use crate::router::{DEFAULT_ROUTER_TIMEOUT, PersonaRouter, Route};
use crate::settings::Settings;

/// An answer and the citations backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Unique `(source, page)` citations in ranked order. Empty for canned answers.
    pub sources: Vec<Citation>,
}

/// The result of [`Orchestrator::route_and_answer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<Citation>,
    pub persona_id: PersonaId,
    pub persona_name: String,
}

/// Runtime facts for health and status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// `"gemini"`, `"ollama"`, or whatever name the orchestrator was built with.
    pub backend: String,
    pub chat_model: String,
    /// `None` when the index cannot be loaded.
    pub indexed_chunks: Option<usize>,
}

/// Wires the persona router, the retriever, and the generator together.
///
/// Holds no per-request state; share one instance across requests.
pub struct Orchestrator {
    router: PersonaRouter,
    retriever: Arc<Retriever>,
    generator: Generator,
    backend_name: String,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Build the production stack: the backend chosen by `settings` and the
    /// index directory at `settings.index_path`, loaded on first use.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = Backend::from_settings(settings)?;
        let retriever = Retriever::builder()
            .config(settings.retrieval_config()?)
            .embedding_provider(backend.embeddings())
            .index_loader(Arc::new(DirectoryIndexLoader::new(&settings.index_path)))
            .build()?;

        Self::builder()
            .chat_model(backend.chat())
            .retriever(Arc::new(retriever))
            .router_timeout(settings.router_timeout)
            .temperature(settings.generation_temperature)
            .backend_name(backend.name())
            .build()
    }

    pub fn catalog(&self) -> &'static PersonaCatalog {
        self.router.catalog()
    }

    /// Route `question` to a persona, retrieve context, and generate an answer.
    ///
    /// Routing never fails. An unavailable knowledge base or an off-topic
    /// question produces a canned answer with no sources.
    ///
    /// # Errors
    ///
    /// - [`RmfError::InvalidInput`] for an empty question, before any work is done.
    /// - [`RmfError::Retrieval`] if the question cannot be embedded or searched.
    /// - [`RmfError::Generation`] if the backend fails to answer.
    #[instrument(skip_all, fields(question_chars = question.chars().count(), prior_turns = history.len()))]
    pub async fn route_and_answer(&self, question: &str, history: &History) -> Result<ChatResponse> {
        validate(question)?;

        let Route { persona, stage } = self.router.route(question).await;
        let persona = self.catalog().get(persona);

        let Answer { answer, sources } =
            self.answer_with_template(&persona.instruction, question, history).await?;

        info!(
            persona = %persona.id,
            stage = stage.as_str(),
            source_count = sources.len(),
            "answered question"
        );

        Ok(ChatResponse {
            answer,
            sources,
            persona_id: persona.id,
            persona_name: persona.name.to_string(),
        })
    }

    /// Answer without routing, using the default consultant instruction.
    pub async fn answer(&self, question: &str, history: &History) -> Result<Answer> {
        validate(question)?;
        self.answer_with_template(DEFAULT_INSTRUCTION, question, history).await
    }

    async fn answer_with_template(
        &self,
        template: &str,
        question: &str,
        history: &History,
    ) -> Result<Answer> {
        let result = match self.retriever.retrieve(question).await? {
            Retrieval::Found(result) => result,
            Retrieval::KnowledgeBaseEmpty => return Ok(canned(KNOWLEDGE_BASE_EMPTY_ANSWER)),
            Retrieval::OutOfScope { .. } => return Ok(canned(OUT_OF_SCOPE_ANSWER)),
        };

        let system = render_instruction(template, &result.context);
        let answer = self.generator.generate(&system, question, history).await?;

        Ok(Answer { answer, sources: result.citations })
    }

    pub async fn status(&self) -> Status {
        Status {
            backend: self.backend_name.clone(),
            chat_model: self.generator.model_name().to_string(),
            indexed_chunks: self.retriever.indexed_chunks().await,
        }
    }
}

fn validate(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(RmfError::InvalidInput("question must not be empty".to_string()));
    }
    Ok(())
}

fn canned(answer: &str) -> Answer {
    Answer { answer: answer.to_string(), sources: Vec::new() }
}

/// Builder for [`Orchestrator`].
///
/// `chat_model` and `retriever` are required. The router classifies with the
/// chat model unless `router_model` is set.
pub struct OrchestratorBuilder {
    chat_model: Option<Arc<dyn ChatModel>>,
    router_model: Option<Arc<dyn ChatModel>>,
    retriever: Option<Arc<Retriever>>,
    router_timeout: Duration,
    temperature: f32,
    backend_name: String,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self {
            chat_model: None,
            router_model: None,
            retriever: None,
            router_timeout: DEFAULT_ROUTER_TIMEOUT,
            temperature: DEFAULT_GENERATION_TEMPERATURE,
            backend_name: "custom".to_string(),
        }
    }
}

impl OrchestratorBuilder {
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    pub fn router_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.router_model = Some(model);
        self
    }

    pub fn retriever(mut self, retriever: Arc<Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn router_timeout(mut self, timeout: Duration) -> Self {
        self.router_timeout = timeout;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn backend_name(mut self, name: impl Into<String>) -> Self {
        self.backend_name = name.into();
        self
    }

    /// # Errors
    ///
    /// Returns [`RmfError::Config`] if a required part is missing.
    pub fn build(self) -> Result<Orchestrator> {
        let chat_model = self
            .chat_model
            .ok_or_else(|| RmfError::Config("chat_model is required".to_string()))?;
        let retriever = self
            .retriever
            .ok_or_else(|| RmfError::Config("retriever is required".to_string()))?;
        let router_model = self.router_model.unwrap_or_else(|| Arc::clone(&chat_model));

        Ok(Orchestrator {
            router: PersonaRouter::new(router_model).with_timeout(self.router_timeout),
            retriever,
            generator: Generator::new(chat_model).with_temperature(self.temperature),
            backend_name: self.backend_name,
        })
    }
}
