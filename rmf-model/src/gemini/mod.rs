//! Gemini provider.
//!
//! Talks to the Generative Language API directly. The system instruction is
//! sent as `systemInstruction`; user turns map to the `user` role and
//! assistant turns to the `model` role.
//!
//! # Example
//!
//! ```rust,ignore
//! use rmf_core::{ChatModel, CompletionRequest};
//! use rmf_model::gemini::{GeminiChatModel, GeminiConfig};
//!
//! let model = GeminiChatModel::new(GeminiConfig::new(api_key, "gemini-2.0-flash"))?;
//! let answer = model
//!     .complete(CompletionRequest::new("You are a NIST consultant.").with_user("What is AC-2?"))
//!     .await?;
//! ```

mod client;
mod config;
mod convert;

pub use client::GeminiChatModel;
pub use config::{GEMINI_API_BASE, GeminiConfig};
