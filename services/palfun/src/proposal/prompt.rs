//! Instruction sent to the upstream model

use crate::config::UpstreamConfig;
use crate::upstream::{ChatMessage, CompletionRequest};

/// Build the structured-output instruction with `input` embedded verbatim.
pub fn build_prompt(input: &str) -> String {
    format!(
        r#"User has this bet idea: "{}"

1. Is this a feasible bet/prediction to track on-chain? (yes/no)
2. Restate the bet clearly in one line.
3. Estimate a confidence score (0-100%) for feasibility and clarity.
4. Suggest **one direct, authoritative, specific URL** (not a description) that can be used to verify the outcome of the bet. If no such site exists, return an official news, data, or government URL.

Return as JSON, and the URL must be in the field "verificationUrl":
{{
  "statement": "...",
  "feasible": "...",
  "confidence": ...,
  "verificationUrl": "https://example.com/official-or-definitive-url"
}}"#,
        input
    )
}

/// Single-turn completion request for `input`.
pub fn build_request(cfg: &UpstreamConfig, input: &str) -> CompletionRequest {
    CompletionRequest {
        model: cfg.model.clone(),
        messages: vec![ChatMessage::user(build_prompt(input))],
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
    }
}
