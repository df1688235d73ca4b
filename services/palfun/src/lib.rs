//! Pal.Fun bet proposal service
//!
//! Turns free-text bet ideas into normalized proposals (statement,
//! feasibility, confidence, one verification URL) using an upstream
//! chat-completion model, and builds "create pal" drafts from them.

pub mod config;
pub mod pal;
pub mod proposal;
pub mod server;
pub mod upstream;

use anyhow::Result;
use std::sync::Arc;
use crate::config::Config;
use crate::proposal::ProposalNormalizer;
use crate::upstream::{CompletionClient, MockCompletionClient, OpenAiClient};

/// Pick the upstream client from config: canned mock or the live endpoint.
pub fn build_client(config: &Config, force_mock: bool) -> Result<Arc<dyn CompletionClient>> {
    if force_mock || config.mock.enabled {
        let content = config.mock.content.clone().unwrap_or_else(default_mock_content);
        return Ok(Arc::new(MockCompletionClient::with_content(&content)));
    }
    Ok(Arc::new(OpenAiClient::from_config(&config.upstream)?))
}

pub fn build_normalizer(config: &Config, force_mock: bool) -> Result<ProposalNormalizer> {
    let client = build_client(config, force_mock)?;
    Ok(ProposalNormalizer::new(client, config.upstream.clone()))
}

fn default_mock_content() -> String {
    r#"```json
{
  "statement": "Bitcoin closes above $100,000 on January 1, 2027",
  "feasible": "yes",
  "confidence": 75,
  "verificationUrl": "https://www.coingecko.com/en/coins/bitcoin"
}
```"#
        .to_string()
}
