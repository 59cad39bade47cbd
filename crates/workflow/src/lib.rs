//! Workflow Lite step implementations, model gateway and workflow engine.
//!
//! This crate provides the built-in text-transformation steps, the registry
//! they are dispatched from, the LLM gateway every step calls through, and the
//! `WorkflowEngine` that threads text through a selected pipeline of steps.
//! Around the engine sit request validation, the history-recording
//! `WorkflowService` and the health check.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Code here sequences calls between the domain types
//! in the [`pipeline`] crate and the infrastructure ports (`LlmProvider`,
//! `RunHistory`). Provider transport and storage live in the `llm` and
//! `history` crates.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`gateway`] | `LlmGateway`, the `ModelGateway` implementation |
//! | [`steps`] | `BuiltinStep` and its prompts |
//! | [`registry`] | `StepRegistry` |
//! | [`engine`] | `WorkflowEngine` and the run state machine |
//! | [`validation`] | `validate_request`, `WorkflowRequest` |
//! | [`service`] | `WorkflowService` |
//! | [`health`] | `check_health`, `HealthReport` |

pub mod engine;
pub mod gateway;
pub mod health;
pub mod registry;
pub mod service;
pub mod steps;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use engine::{RunState, WorkflowEngine};
pub use gateway::{LlmGateway, MAX_OUTPUT_TOKENS, TEMPERATURE};
pub use health::{check_health, ComponentStatus, HealthReport};
pub use registry::{ResolvedStep, StepRegistry};
pub use service::WorkflowService;
pub use steps::BuiltinStep;
pub use validation::{validate_request, ValidationError, WorkflowRequest};
