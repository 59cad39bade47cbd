//! OpenAI-compatible provider implementation.
//!
//! [`OpenAiCompatProvider`] talks to any endpoint that accepts the OpenAI
//! chat-completions request format: Groq (the default), OpenAI, Together,
//! a local server, and so on. It reports failures as transport facts
//! ([`ProviderError`]); the gateway decides what they mean to a user.

use async_trait::async_trait;
use pipeline::{CompletionRequest, CompletionResponse, LlmProvider, ProviderError};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::types::{ChatRequest, ChatResponse};

/// An [`LlmProvider`] for the OpenAI-compatible chat completion API.
///
/// One instance owns one pooled `reqwest::Client` and is meant to be
/// constructed once at startup and shared.
pub struct OpenAiCompatProvider {
    config: ProviderConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Creates a provider that reads its API key from `config.api_key_env`
    /// at request time.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built (e.g. TLS backend init).
    pub fn new(config: ProviderConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            config,
            http,
            api_key: None,
        })
    }

    /// Creates a provider with an explicit API key, bypassing the environment.
    pub fn with_api_key(config: ProviderConfig, api_key: String) -> reqwest::Result<Self> {
        let mut provider = Self::new(config)?;
        provider.api_key = Some(api_key);
        Ok(provider)
    }

    /// Resolve the API key: explicit key > environment variable.
    fn resolve_api_key(&self) -> Result<String, ProviderError> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::MissingCredentials(format!(
                    "set the {} environment variable",
                    self.config.api_key_env
                ))
            })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_key = self.resolve_api_key()?;
        let body = ChatRequest::from_completion(&self.config.model, request);

        debug!(
            provider = %self.config.name,
            model = %body.model,
            messages = body.messages.len(),
            max_tokens = body.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                provider = %self.config.name,
                status = status.as_u16(),
                "chat completion request rejected"
            );
            return Err(classify_status(status.as_u16(), &body));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        debug!(
            provider = %self.config.name,
            choices = chat.choices.len(),
            "chat completion response received"
        );

        Ok(CompletionResponse {
            text: chat
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
            model: chat.model.unwrap_or_default(),
            total_tokens: chat.usage.map(|u| u.total_tokens),
        })
    }
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn classify_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() || err.is_body() {
        ProviderError::InvalidResponse(err.to_string())
    } else {
        ProviderError::Connection(err.to_string())
    }
}

fn classify_status(status: u16, body: &str) -> ProviderError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => ProviderError::Unauthorized(message),
        429 => ProviderError::RateLimited(message),
        500..=599 => ProviderError::ServerError {
            status,
            body: message,
        },
        _ => ProviderError::UnexpectedStatus {
            status,
            body: message,
        },
    }
}

/// Extract a human-readable error message from a JSON error response body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        // OpenAI format: {"error": {"message": "..."}}
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            // Bare format: {"error": "..."}
            .or_else(|| v.as_str().map(String::from))
    })
}
