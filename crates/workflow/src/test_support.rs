//! Fakes shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pipeline::{
    CompletionRequest, CompletionResponse, GatewayError, GatewayResult, LlmProvider,
    ModelGateway, ModelId, ProviderError, TokenCount,
};

/// Provider that replays a fixed queue of outcomes and records every request.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<CompletionResponse, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub const MODEL: &'static str = "scripted-model";

    pub fn new(script: Vec<Result<CompletionResponse, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        Self::MODEL
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted provider ran out of responses")
    }
}

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub system_prompt: String,
    pub user_prompt: String,
}

type Responder = Box<dyn Fn(usize, &str) -> Result<String, GatewayError> + Send + Sync>;

/// Gateway whose answers come from a closure over (call index, user prompt).
pub struct ScriptedGateway {
    responder: Responder,
    calls: Mutex<Vec<GatewayCall>>,
    reachable: bool,
}

impl ScriptedGateway {
    pub fn new(
        responder: impl Fn(usize, &str) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            reachable: true,
        }
    }

    /// Makes [`check_connectivity`](ModelGateway::check_connectivity) report
    /// the model API as unreachable.
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Answers call `n` with `"output-n"`.
    pub fn numbered() -> Self {
        Self::new(|n, _| Ok(format!("output-{n}")))
    }

    /// Answers like [`numbered`](Self::numbered) but fails call `index` with `error`.
    pub fn failing_at(index: usize, error: GatewayError) -> Self {
        Self::new(move |n, _| {
            if n == index {
                Err(error.clone())
            } else {
                Ok(format!("output-{n}"))
            }
        })
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<GatewayResult, GatewayError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(GatewayCall {
                system_prompt: system_prompt.to_string(),
                user_prompt: user_prompt.to_string(),
            });
            calls.len() - 1
        };
        let output = (self.responder)(index, user_prompt)?;
        Ok(GatewayResult {
            output,
            model: ModelId::from_static("scripted-model"),
            tokens_used: TokenCount::new(10),
            latency_ms: 5,
        })
    }

    async fn check_connectivity(&self) -> bool {
        self.reachable
    }
}

pub fn rate_limited() -> GatewayError {
    GatewayError::RateLimit {
        provider: "scripted".into(),
    }
}
