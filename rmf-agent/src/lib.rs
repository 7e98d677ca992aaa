//! # rmf-agent
//!
//! Persona routing and answer orchestration for the RMF assistant.
//!
//! ## Overview
//!
//! A question flows through three steps:
//!
//! 1. [`PersonaRouter`] picks one of seven specialist [`Persona`]s, first by
//!    keyword and then, if nothing matched, by asking the chat model. It
//!    always settles on a persona, falling back to the NIST controls specialist.
//! 2. [`rmf_rag::Retriever`] fetches relevance-guarded context.
//! 3. [`Generator`] answers with the persona instruction, the context, and
//!    the caller's history.
//!
//! [`Orchestrator::route_and_answer`] runs all three and returns a
//! [`ChatResponse`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rmf_agent::{Orchestrator, Settings};
//! use rmf_core::History;
//!
//! let orchestrator = Orchestrator::from_settings(&Settings::from_env()?)?;
//! let response = orchestrator.route_and_answer("Map AC-2 to FedRAMP", &History::new()).await?;
//! assert_eq!(response.persona_id.as_str(), "COMPLIANCE_SPECIALIST");
//! ```

pub mod backend;
pub mod generation;
pub mod orchestrator;
pub mod persona;
pub mod prompt;
pub mod router;
pub mod settings;

pub use backend::{Backend, BackendKind};
pub use generation::Generator;
pub use orchestrator::{Answer, ChatResponse, Orchestrator, OrchestratorBuilder, Status};
pub use persona::{Persona, PersonaCatalog, PersonaId};
pub use prompt::{KNOWLEDGE_BASE_EMPTY_ANSWER, OUT_OF_SCOPE_ANSWER};
pub use router::{FallbackReason, KeywordTable, PersonaRouter, Route, RouteStage};
pub use settings::Settings;
