//! Core domain for Workflow Lite.
//!
//! This crate contains every domain concept shared across the workspace: the
//! newtype identifiers, step metadata, the per-step and per-run result
//! records, the error taxonomy and the port traits that the orchestration and
//! infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; the `workflow`, `llm` and `history` crates
//! define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`StepId`, `ModelId`, `RunId`) |
//! | [`types`] | Value types (`TokenCount`, `StepDescriptor`, `Timestamp`) |
//! | [`results`] | `GatewayResult`, `StepResult`, `WorkflowResult` |
//! | [`errors`] | Provider, gateway, engine, registry and history errors |
//! | [`ports`] | `LlmProvider`, `ModelGateway`, `Step`, `RunHistory` |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod results;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{GatewayError, HistoryError, ProviderError, RegistryError, WorkflowError};
pub use identifiers::{EmptyIdentifier, ModelId, RunId, StepId};
pub use ports::{
    CompletionRequest, CompletionResponse, LlmProvider, ModelGateway, RunHistory, Step,
};
pub use results::{GatewayResult, RunOutcome, StepResult, WorkflowResult};
pub use types::{StepDescriptor, Timestamp, TokenCount};
