//! The model gateway: the single choke point between steps and the provider.
//!
//! [`LlmGateway`] wraps an [`LlmProvider`] and adds everything the steps must
//! not care about: fixed generation settings, latency measurement, output
//! trimming, the empty-output check, error classification and one structured
//! log event per call.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use pipeline::{
    CompletionRequest, GatewayError, GatewayResult, LlmProvider, ModelGateway, ModelId, TokenCount,
};
use tracing::{debug, error, info, warn};

/// Sampling temperature for every step call; kept low so reruns agree.
pub const TEMPERATURE: f64 = 0.3;

/// Cap on generated tokens per step call.
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

const CONNECTIVITY_PROMPT: &str = "Respond with OK.";
const CONNECTIVITY_MAX_TOKENS: u32 = 5;

/// [`ModelGateway`] backed by an [`LlmProvider`].
///
/// Holds no per-call state, so one instance is shared (behind an `Arc`) by
/// every concurrent run.
pub struct LlmGateway {
    provider: Arc<dyn LlmProvider>,
}

impl LlmGateway {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    async fn call(
        &self,
        request: &CompletionRequest,
    ) -> Result<(String, ModelId, TokenCount), GatewayError> {
        let provider = self.provider.name();
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| GatewayError::from_provider(provider, e))?;

        let output = response
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GatewayError::EmptyResponse {
                provider: provider.to_string(),
            })?
            .to_string();

        let model = Some(response.model)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.provider.model().to_string());
        let model = ModelId::new(model).ok_or_else(|| GatewayError::Unknown {
            message: format!("{provider} did not report a model id"),
        })?;

        let tokens = TokenCount::new(response.total_tokens.unwrap_or(0));
        Ok((output, model, tokens))
    }
}

#[async_trait]
impl ModelGateway for LlmGateway {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<GatewayResult, GatewayError> {
        let request = CompletionRequest {
            system_prompt: Some(system_prompt.to_string()),
            user_prompt: user_prompt.to_string(),
            temperature: Some(TEMPERATURE),
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let started = Instant::now();
        let outcome = self.call(&request).await;
        let latency_ms = elapsed_ms(started);

        match outcome {
            Ok((output, model, tokens_used)) => {
                info!(
                    provider = %self.provider.name(),
                    model = %model,
                    tokens_used = tokens_used.as_u64(),
                    latency_ms,
                    "model call completed"
                );
                Ok(GatewayResult {
                    output,
                    model,
                    tokens_used,
                    latency_ms,
                })
            }
            Err(err) => {
                error!(
                    provider = %self.provider.name(),
                    elapsed_ms = latency_ms,
                    error = %err,
                    "model call failed"
                );
                Err(err)
            }
        }
    }

    async fn check_connectivity(&self) -> bool {
        let request = CompletionRequest {
            system_prompt: None,
            user_prompt: CONNECTIVITY_PROMPT.to_string(),
            temperature: None,
            max_tokens: CONNECTIVITY_MAX_TOKENS,
        };

        match self.provider.complete(&request).await {
            Ok(response) => {
                let answered = response
                    .text
                    .as_deref()
                    .is_some_and(|text| !text.trim().is_empty());
                debug!(provider = %self.provider.name(), answered, "connectivity probe finished");
                answered
            }
            Err(err) => {
                warn!(provider = %self.provider.name(), error = %err, "connectivity probe failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .finish()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
