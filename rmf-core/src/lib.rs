//! # rmf-core
//!
//! Shared building blocks for the RMF assistant crates.
//!
//! - [`RmfError`] - the request-level error taxonomy
//! - [`Turn`] / [`History`] - caller-supplied conversation turns
//! - [`ChatModel`] - the "complete a chat turn" capability every generation
//!   backend implements
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod history;
pub mod model;

pub use error::{Result, RmfError};
pub use history::{History, RawTurn, Turn};
pub use model::{ChatModel, CompletionRequest};
