//! Process configuration read from the environment.
//!
//! `.env` is loaded by `main` before [`AppConfig::from_env`] runs, so values
//! from the file and the real environment look the same here.

use std::path::PathBuf;

use llm::ProviderConfig;
use thiserror::Error;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const MODEL_ENV: &str = "GROQ_MODEL";
pub const BASE_URL_ENV: &str = "GROQ_BASE_URL";
pub const TIMEOUT_ENV: &str = "LLM_TIMEOUT_SECS";
pub const HISTORY_PATH_ENV: &str = "WFLITE_HISTORY_PATH";
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

pub const DEFAULT_HISTORY_PATH: &str = "data/workflow_runs.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub history_path: PathBuf,
    pub otlp_endpoint: Option<String>,
    /// Whether the API key variable was set. Only used for a startup warning;
    /// the provider reads the key itself on every call.
    pub api_key_present: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut provider = ProviderConfig::groq();
        if let Some(model) = var(MODEL_ENV) {
            provider = provider.with_model(model);
        }
        if let Some(base_url) = var(BASE_URL_ENV) {
            provider = provider.with_base_url(base_url);
        }
        if let Some(raw) = var(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout {
                    var: TIMEOUT_ENV,
                    value: raw.clone(),
                })?;
            provider = provider.with_timeout_secs(secs);
        }

        Ok(Self {
            provider,
            history_path: var(HISTORY_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH)),
            otlp_endpoint: var(OTLP_ENDPOINT_ENV),
            api_key_present: var(API_KEY_ENV).is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
        assert_eq!(config.provider.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.provider.api_key_env, API_KEY_ENV);
        assert_eq!(config.provider.timeout().as_secs(), 60);
        assert_eq!(config.history_path, PathBuf::from(DEFAULT_HISTORY_PATH));
        assert!(config.otlp_endpoint.is_none());
        assert!(!config.api_key_present);
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_pairs(&[
            (API_KEY_ENV, "gsk_test"),
            (MODEL_ENV, "llama-3.3-70b-versatile"),
            (BASE_URL_ENV, "http://localhost:8080/v1"),
            (TIMEOUT_ENV, " 15 "),
            (HISTORY_PATH_ENV, "/tmp/runs.json"),
            (OTLP_ENDPOINT_ENV, "http://localhost:4317"),
        ])
        .unwrap();

        assert_eq!(config.provider.model, "llama-3.3-70b-versatile");
        assert_eq!(
            config.provider.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.provider.timeout().as_secs(), 15);
        assert_eq!(config.history_path, PathBuf::from("/tmp/runs.json"));
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://localhost:4317"));
        assert!(config.api_key_present);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = from_pairs(&[(API_KEY_ENV, "  "), (MODEL_ENV, "")]).unwrap();
        assert!(!config.api_key_present);
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        for bad in ["abc", "0", "-5", "1.5"] {
            let err = from_pairs(&[(TIMEOUT_ENV, bad)]).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidTimeout {
                    var: TIMEOUT_ENV,
                    value: bad.to_string()
                }
            );
        }
    }
}
