//! OpenAI chat-completions wire format.
//!
//! Only the fields this system sends or reads are modelled; everything else
//! in a provider response is ignored.

use pipeline::CompletionRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Wire request for `request` against `model`.
    pub fn from_completion(model: &str, request: &CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(request.user_prompt.clone()));
        Self {
            model: model.to_string(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_puts_system_prompt_first() {
        let request = CompletionRequest {
            system_prompt: Some("rules".into()),
            user_prompt: "task".into(),
            temperature: Some(0.3),
            max_tokens: 1024,
        };
        let wire = serde_json::to_value(ChatRequest::from_completion("m", &request)).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "rules"},
                    {"role": "user", "content": "task"}
                ],
                "temperature": 0.3,
                "max_tokens": 1024
            })
        );
    }

    #[test]
    fn request_without_system_prompt_or_temperature() {
        let request = CompletionRequest {
            system_prompt: None,
            user_prompt: "Respond with OK.".into(),
            temperature: None,
            max_tokens: 5,
        };
        let wire = serde_json::to_value(ChatRequest::from_completion("m", &request)).unwrap();
        assert_eq!(wire["messages"].as_array().unwrap().len(), 1);
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(parsed.choices.is_empty());
        assert!(parsed.usage.is_none());

        let parsed: ChatResponse = serde_json::from_str(
            r#"{"model": "m", "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
