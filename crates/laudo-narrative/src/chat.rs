//! OpenAI-compatible chat-completions client
//!
//! Defaults target Groq's hosted endpoint. Any service speaking the same
//! `/chat/completions` protocol works by overriding the endpoint and model.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{CompletionClient, CompletionError, CompletionRequest};

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const ENDPOINT_VAR: &str = "LAUDO_COMPLETIONS_URL";
pub const MODEL_VAR: &str = "LAUDO_COMPLETIONS_MODEL";

#[derive(Clone)]
pub struct ChatCompletionsConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Configuration from the environment; `None` when no API key is set
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let mut config = Self::new(api_key);
        if let Ok(endpoint) = std::env::var(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var(MODEL_VAR) {
            config.model = model;
        }
        Some(config)
    }
}

impl std::fmt::Debug for ChatCompletionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct ChatCompletionsClient {
    client: reqwest::Client,
    config: ChatCompletionsConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

fn request_body<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &request.prompt,
    });
    ChatRequest {
        model,
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

/// Text of the first choice, if it has any
fn first_choice_text(response: ChatResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse)
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = request_body(&self.config.model, &request);
        debug!(
            model = %self.config.model,
            max_tokens = request.max_tokens,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        first_choice_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_with_system_prompt() {
        let request = CompletionRequest::new("Reescreva", 0.7, 1000).with_system("Você é engenheiro");
        let body = serde_json::to_value(request_body("llama3-8b-8192", &request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "llama3-8b-8192",
                "messages": [
                    {"role": "system", "content": "Você é engenheiro"},
                    {"role": "user", "content": "Reescreva"}
                ],
                "temperature": 0.7f32,
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn test_request_body_without_system_prompt() {
        let request = CompletionRequest::new("Organize", 0.5, 500);
        let body = serde_json::to_value(request_body(DEFAULT_MODEL, &request)).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_first_choice_text() {
        let parsed: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "Laudo gerado"}}]
        }))
        .unwrap();
        assert_eq!(first_choice_text(parsed).unwrap(), "Laudo gerado");
    }

    #[test]
    fn test_empty_choices_are_an_error() {
        let parsed: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            first_choice_text(parsed),
            Err(CompletionError::EmptyResponse)
        ));

        let parsed: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "   "}}]
        }))
        .unwrap();
        assert!(matches!(
            first_choice_text(parsed),
            Err(CompletionError::EmptyResponse)
        ));
    }

    #[test]
    fn test_config_debug_hides_key() {
        let config = ChatCompletionsConfig::new("gsk_secret");
        assert!(!format!("{config:?}").contains("gsk_secret"));
    }

    #[test]
    fn test_config_defaults() {
        let config = ChatCompletionsConfig::new("key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
