//! The completion capability the generator depends on

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One prompt for a chat-completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature,
            max_tokens,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Completion response had no text")]
    EmptyResponse,
}

/// A service that completes a prompt with text
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
