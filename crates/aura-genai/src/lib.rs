//! Gemini client for the storefront chat assistant.
//!
//! The keyword rules in `aura-core` answer catalog questions directly; this
//! crate covers everything else by sending a persona-framed prompt to the
//! `generateContent` endpoint. Transient failures are retried with back-off,
//! safety blocks and malformed bodies are not.

pub mod client;
pub mod error;
pub mod prompt;
mod retry;
mod types;

pub use client::{GenAiClient, GenAiSettings};
pub use error::GenAiError;
pub use prompt::build_chat_prompt;
