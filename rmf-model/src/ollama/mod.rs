//! Ollama provider.
//!
//! Uses the non-streaming `/api/chat` endpoint of a local Ollama server.
//!
//! # Example
//!
//! ```rust,ignore
//! use rmf_model::ollama::{OllamaChatModel, OllamaConfig};
//!
//! let model = OllamaChatModel::new(
//!     OllamaConfig::new("llama3").with_base_url("http://gpu-box:11434"),
//! )?;
//! ```

mod client;
mod config;
mod convert;

pub use client::OllamaChatModel;
pub use config::{DEFAULT_OLLAMA_URL, OllamaConfig};
