//! Port traits implemented by the orchestration and infrastructure crates.
//!
//! | Trait | Implemented in | Consumed by |
//! |-------|----------------|-------------|
//! | [`LlmProvider`] | `llm` | the model gateway |
//! | [`ModelGateway`] | `workflow` | steps, health check |
//! | [`Step`] | `workflow` | registry, engine |
//! | [`RunHistory`] | `history` | workflow service, health check |
//!
//! All traits are object-safe (`async_trait`) so components hold them as
//! `Arc<dyn ...>` and tests substitute fakes.

use async_trait::async_trait;

use crate::{
    GatewayError, GatewayResult, HistoryError, ProviderError, StepDescriptor, WorkflowResult,
};

// ---------------------------------------------------------------------------
// LLM provider
// ---------------------------------------------------------------------------

/// A single chat completion request: optional system prompt plus one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Role and rules for the model.
    pub system_prompt: Option<String>,
    /// The task and its input text.
    pub user_prompt: String,
    /// Sampling temperature; `None` uses the provider default.
    pub temperature: Option<f64>,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// What a provider returned for a [`CompletionRequest`].
///
/// `text` is the first choice's content exactly as received (possibly padded
/// or empty); `None` when the provider returned no choice at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Content of the first choice, untouched.
    pub text: Option<String>,
    /// Model the provider reports having used.
    pub model: String,
    /// Provider-reported total token usage, if any.
    pub total_tokens: Option<u64>,
}

/// Transport adapter for one language-model provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name used in logs and error messages (e.g. `"groq"`).
    fn name(&self) -> &str;

    /// Model requests are sent to.
    fn model(&self) -> &str;

    /// Issues exactly one completion request.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

// ---------------------------------------------------------------------------
// Model gateway
// ---------------------------------------------------------------------------

/// The sole boundary between workflow steps and the language model.
///
/// Implementations must be safe to call concurrently from independent runs
/// and must never return a [`GatewayResult`] whose `output` is blank.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generates text for a system/user prompt pair.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<GatewayResult, GatewayError>;

    /// Returns whether a minimal request produced a non-empty answer.
    /// Never fails; every error maps to `false`.
    async fn check_connectivity(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// A named text transformation backed by one gateway call.
///
/// Steps hold no per-call state and never see other steps' data; sequencing
/// belongs to the engine.
#[async_trait]
pub trait Step: Send + Sync {
    /// Static metadata for this step.
    fn descriptor(&self) -> StepDescriptor;

    /// Transforms `input` through `gateway`, propagating gateway errors unchanged.
    async fn run(
        &self,
        gateway: &dyn ModelGateway,
        input: &str,
    ) -> Result<GatewayResult, GatewayError>;
}

// ---------------------------------------------------------------------------
// Run history
// ---------------------------------------------------------------------------

/// Bounded store of recent workflow runs.
#[async_trait]
pub trait RunHistory: Send + Sync {
    /// Stores `run` and prunes older runs beyond the retention limit.
    async fn save(&self, run: &WorkflowResult) -> Result<(), HistoryError>;

    /// Returns the retained runs, newest first.
    async fn recent(&self) -> Result<Vec<WorkflowResult>, HistoryError>;

    /// Returns whether the backing store is usable.
    async fn is_healthy(&self) -> bool;
}
