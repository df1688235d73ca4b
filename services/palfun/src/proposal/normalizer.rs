//! Bet proposal normalizer: one upstream call, then tolerant extraction

use anyhow::Context;
use std::sync::Arc;
use crate::config::UpstreamConfig;
use crate::proposal::error::ProposalError;
use crate::proposal::extract::extract_proposal;
use crate::proposal::prompt::build_request;
use crate::proposal::types::{BetProposalRequest, NormalizedProposal};
use crate::upstream::CompletionClient;

/// Stateless; safe to share across concurrent requests.
#[derive(Clone)]
pub struct ProposalNormalizer {
    client: Arc<dyn CompletionClient>,
    upstream: UpstreamConfig,
}

impl ProposalNormalizer {
    pub fn new(client: Arc<dyn CompletionClient>, upstream: UpstreamConfig) -> Self {
        Self { client, upstream }
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    /// Validate `raw_input` and normalize it.
    pub async fn normalize(&self, raw_input: &str) -> Result<NormalizedProposal, ProposalError> {
        let request = BetProposalRequest::new(raw_input)?;
        self.normalize_request(&request).await
    }

    pub async fn normalize_request(
        &self,
        request: &BetProposalRequest,
    ) -> Result<NormalizedProposal, ProposalError> {
        let completion_request = build_request(&self.upstream, &request.input);
        let response = self.client.complete(&completion_request).await?;

        if !response.is_success() {
            return Err(ProposalError::Upstream {
                status: response.status,
                body: response.body,
            });
        }

        let raw: serde_json::Value = serde_json::from_str(&response.body)
            .context("Upstream response body is not JSON")?;

        let content = raw
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let parsed = extract_proposal(content);

        Ok(NormalizedProposal { parsed, raw })
    }
}
