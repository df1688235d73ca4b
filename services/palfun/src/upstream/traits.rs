use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Single-turn chat completion request, serialized as the upstream body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Raw upstream answer. Non-success statuses are returned here, not as errors,
/// so callers can pass the diagnostic through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub status: u16,
    pub body: String,
}

impl CompletionResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &str;

    /// Issue exactly one request. `Err` means no HTTP status was obtained.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
