use super::traits::{CompletionClient, CompletionRequest, CompletionResponse};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Only the most recent requests are kept so a long-running mock server stays bounded.
pub const MAX_RECORDED_REQUESTS: usize = 64;

#[derive(Debug, Clone)]
enum MockReply {
    Response(CompletionResponse),
    TransportError(String),
}

/// Canned upstream used by tests and `--mock` runs.
pub struct MockCompletionClient {
    name: String,
    reply: MockReply,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    /// Answers 200 with an OpenAI-shaped body whose first choice carries `content`.
    pub fn with_content(content: &str) -> Self {
        Self::with_response(200, &completion_body(content))
    }

    pub fn with_response(status: u16, body: &str) -> Self {
        Self::from_reply(MockReply::Response(CompletionResponse {
            status,
            body: body.to_string(),
        }))
    }

    pub fn failing(message: &str) -> Self {
        Self::from_reply(MockReply::TransportError(message.to_string()))
    }

    fn from_reply(reply: MockReply) -> Self {
        Self {
            name: "mock".to_string(),
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// The last `MAX_RECORDED_REQUESTS` requests, oldest first.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

/// Wrap `content` the way a chat completions endpoint would.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "mock",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        {
            let mut requests = self.requests.lock().await;
            if requests.len() >= MAX_RECORDED_REQUESTS {
                requests.remove(0);
            }
            requests.push(request.clone());
        }

        match &self.reply {
            MockReply::Response(response) => Ok(response.clone()),
            MockReply::TransportError(message) => anyhow::bail!("{}", message),
        }
    }
}
