use super::traits::{CompletionClient, CompletionRequest, CompletionResponse};
use crate::config::UpstreamConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    name: String,
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let endpoint = completions_endpoint(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            name: "openai".to_string(),
            client,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(cfg: &UpstreamConfig) -> Result<Self> {
        let api_key = cfg.api_key()?;
        Self::new(&cfg.base_url, api_key, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn completions_endpoint(base_url: &str) -> Result<Url> {
    // Url::join drops the last path segment unless the base ends with '/'
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    let base = Url::parse(&base).with_context(|| format!("Invalid upstream base_url: {}", base_url))?;
    base.join("chat/completions")
        .context("Failed to build chat completions URL")
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        tracing::info!("Calling upstream at {} with model {}", self.endpoint, request.model);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("Upstream completion request failed")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read upstream response body")?;

        if !(200..300).contains(&status) {
            tracing::warn!("Upstream returned status {}", status);
        }

        Ok(CompletionResponse { status, body })
    }
}
