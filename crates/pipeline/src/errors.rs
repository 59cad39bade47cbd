//! Error types for the workflow domain.
//!
//! Errors are layered the same way the components are:
//!
//! - [`ProviderError`]: transport-level failure reported by an
//!   [`LlmProvider`](crate::LlmProvider) (HTTP status, connection, parsing).
//! - [`GatewayError`]: the classified, human-actionable taxonomy the model
//!   gateway produces from a [`ProviderError`]. Steps and the engine only ever
//!   see this type.
//! - [`WorkflowError`]: engine invariant violations. These are the only
//!   errors that escape a run; step failures are recorded as data instead.
//! - [`RegistryError`]: registry construction mistakes, caught at startup.
//! - [`HistoryError`]: run history storage failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::StepId;

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

/// Failure reported by an LLM provider adapter.
///
/// Carries transport facts only; turning them into user-facing messages is the
/// gateway's job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No API key was configured for the provider.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// The provider rejected the credentials (HTTP 401/403).
    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    /// The provider throttled the request (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider failed server-side (HTTP 5xx).
    #[error("server error (HTTP {status}): {body}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Any other non-success HTTP status.
    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// DNS resolution or TCP/TLS connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Classified failure of a model gateway call.
///
/// Every variant renders a message a user can act on. The engine stores
/// `to_string()` of this error in the failed step's result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Credentials missing, rejected or expired.
    #[error("{provider} API key is invalid or expired ({detail}). Check your API key configuration.")]
    Auth {
        /// Provider name (e.g. `"groq"`).
        provider: String,
        /// Provider-supplied detail.
        detail: String,
    },

    /// Provider-side throttling.
    #[error("{provider} rate limit exceeded. Please wait a moment and try again.")]
    RateLimit {
        /// Provider name.
        provider: String,
    },

    /// Provider returned a 5xx or is otherwise degraded.
    #[error("{provider} service is temporarily unavailable (HTTP {status}). Try again shortly.")]
    ProviderUnavailable {
        /// Provider name.
        provider: String,
        /// HTTP status code returned by the provider.
        status: u16,
    },

    /// DNS, connection or timeout failure before a response was received.
    #[error("Cannot reach {provider} API ({detail}). Check your internet connection.")]
    Network {
        /// Provider name.
        provider: String,
        /// Underlying transport message.
        detail: String,
    },

    /// The provider answered but produced no usable text.
    #[error("{provider} returned an empty response.")]
    EmptyResponse {
        /// Provider name.
        provider: String,
    },

    /// Anything else, wrapping the underlying message.
    #[error("LLM processing failed: {message}")]
    Unknown {
        /// The underlying failure message.
        message: String,
    },
}

impl GatewayError {
    /// Classifies a provider failure for `provider`.
    pub fn from_provider(provider: &str, error: ProviderError) -> Self {
        let provider = provider.to_string();
        match error {
            ProviderError::MissingCredentials(detail) | ProviderError::Unauthorized(detail) => {
                Self::Auth { provider, detail }
            }
            ProviderError::RateLimited(_) => Self::RateLimit { provider },
            ProviderError::ServerError { status, .. } => {
                Self::ProviderUnavailable { provider, status }
            }
            ProviderError::Connection(detail) => Self::Network { provider, detail },
            ProviderError::Timeout => Self::Network {
                provider,
                detail: "request timed out".to_string(),
            },
            other @ (ProviderError::UnexpectedStatus { .. }
            | ProviderError::InvalidResponse(_)) => Self::Unknown {
                message: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

/// Errors that abort a run instead of being recorded as a failed step.
///
/// Both indicate a broken contract with the caller's validation, not a
/// transient condition.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum WorkflowError {
    /// A selected step id is not in the registry.
    #[error("Step handler not found for: \"{step_id}\"")]
    StepNotFound {
        /// The id that failed to resolve.
        step_id: StepId,
    },

    /// The run was started with an empty step list.
    #[error("No workflow steps were selected")]
    NoSteps,
}

/// Registry construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two steps were registered under the same id.
    #[error("Step \"{step_id}\" is registered more than once")]
    DuplicateStep {
        /// The id registered twice.
        step_id: StepId,
    },
}

/// Run history storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Reading or writing the backing store failed.
    #[error("history storage failed: {0}")]
    Storage(String),

    /// A stored record could not be encoded or decoded.
    #[error("history record could not be (de)serialized: {0}")]
    Serialization(String),
}
