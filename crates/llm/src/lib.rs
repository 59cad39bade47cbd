//! Workflow Lite LLM provider infrastructure adapter.
//!
//! Implements the [`pipeline::LlmProvider`] trait for OpenAI-compatible chat
//! completion APIs, Groq by default. Other providers speaking the same wire
//! format are reached by changing [`ProviderConfig`]; a provider with a
//! different protocol is added as a new `impl` in this crate without any
//! change to `pipeline` or `workflow`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing
//! and status-code classification live here. The `workflow` crate sees only
//! [`pipeline::LlmProvider`].

pub mod config;
pub mod openai_compat;
pub mod types;

pub use config::{ProviderConfig, DEFAULT_TIMEOUT_SECS};
pub use openai_compat::OpenAiCompatProvider;
