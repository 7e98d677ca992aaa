//! # rmf-model
//!
//! Generation backends for the RMF assistant.
//!
//! ## Overview
//!
//! Every backend implements [`rmf_core::ChatModel`]:
//!
//! - [`GeminiChatModel`] - Google's Gemini models over the `generateContent` REST API
//! - [`OllamaChatModel`] - local models served by Ollama (`/api/chat`)
//! - [`MockChatModel`] - scripted replies for tests
//!
//! ## Quick Start
//!
//! ### Gemini
//!
//! ```rust,ignore
//! use rmf_model::gemini::{GeminiChatModel, GeminiConfig};
//!
//! let model = GeminiChatModel::new(GeminiConfig::new(
//!     std::env::var("GEMINI_API_KEY")?,
//!     "gemini-2.0-flash",
//! ))?;
//! ```
//!
//! ### Ollama
//!
//! ```rust,ignore
//! use rmf_model::ollama::{OllamaChatModel, OllamaConfig};
//!
//! let model = OllamaChatModel::new(OllamaConfig::new("llama3"))?;
//! ```
//!
//! ## Supported Models
//!
//! | Backend | Default model | Notes |
//! |---------|---------------|-------|
//! | Gemini | `gemini-2.0-flash` | selected when `GEMINI_API_KEY` is set |
//! | Ollama | `llama3` | local fallback, no API key |

#[cfg(feature = "gemini")]
pub mod gemini;
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiChatModel, GeminiConfig};
pub use mock::{MockChatModel, MockReply};
#[cfg(feature = "ollama")]
pub use ollama::{OllamaChatModel, OllamaConfig};
