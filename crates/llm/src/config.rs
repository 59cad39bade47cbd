//! Provider connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// How to reach one OpenAI-compatible provider.
///
/// Stores the *name* of the environment variable holding the API key, never
/// the key itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name used in logs and error messages (e.g. `"groq"`).
    pub name: String,

    /// Base URL of the OpenAI-compatible API (e.g. `"https://api.groq.com/openai/v1"`).
    pub base_url: String,

    /// Environment variable that holds the API key (e.g. `"GROQ_API_KEY"`).
    pub api_key_env: String,

    /// Model every request is sent to.
    pub model: String,

    /// Request timeout in seconds. Defaults to [`DEFAULT_TIMEOUT_SECS`].
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Groq's OpenAI-compatible endpoint with its small instant model.
    pub fn groq() -> Self {
        Self {
            name: "groq".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            api_key_env: "GROQ_API_KEY".into(),
            model: "llama-3.1-8b-instant".into(),
            timeout_secs: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// The chat completions endpoint URL.
    pub fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}
