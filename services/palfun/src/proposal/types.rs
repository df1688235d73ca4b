//! Request and result records for bet proposals

use serde::{Deserialize, Serialize};
use crate::proposal::error::ProposalError;

/// A free-form bet idea as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetProposalRequest {
    pub input: String,
}

impl BetProposalRequest {
    /// Reject empty input before anything goes over the network.
    pub fn new(input: impl Into<String>) -> Result<Self, ProposalError> {
        let input = input.into();
        if input.is_empty() {
            return Err(ProposalError::InvalidInput);
        }
        Ok(Self { input })
    }

    /// Accept only a JSON string in `input`, as sent by the UI.
    pub fn from_json(body: &serde_json::Value) -> Result<Self, ProposalError> {
        match body.get("input").and_then(|v| v.as_str()) {
            Some(input) => Self::new(input),
            None => Err(ProposalError::InvalidInput),
        }
    }
}

/// Upstream confidence, kept in whatever shape it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Number(serde_json::Number),
    Text(String),
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Text(String::new())
    }
}

impl Confidence {
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Confidence::default(),
            serde_json::Value::Number(n) => Confidence::Number(n.clone()),
            serde_json::Value::String(s) => Confidence::Text(s.clone()),
            other => Confidence::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Confidence::Text(s) if s.is_empty())
    }

    /// Numeric reading; accepts strings like "85" or "85%".
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Confidence::Number(n) => n.as_f64(),
            Confidence::Text(s) => {
                let s = s.trim();
                s.strip_suffix('%').unwrap_or(s).trim().parse().ok()
            }
        }
    }
}

/// Normalized proposal. Every field defaults to empty because the upstream is untrusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetProposalResult {
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub feasible: String,
    #[serde(default)]
    pub confidence: Confidence,
    /// Empty or exactly one `http(s)://` URL with no whitespace.
    #[serde(default)]
    pub verification_url: String,
}

impl BetProposalResult {
    pub fn is_feasible(&self) -> bool {
        self.feasible == "yes"
    }
}

/// Outcome of one normalize call: the extracted record (if any) and the raw upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProposal {
    /// `None` when no JSON object could be recovered from the completion text.
    pub parsed: Option<BetProposalResult>,
    pub raw: serde_json::Value,
}

impl NormalizedProposal {
    /// The record with every field present, empty when extraction failed.
    pub fn result(&self) -> BetProposalResult {
        self.parsed.clone().unwrap_or_default()
    }

    /// Upstream payload with the extracted record added under `parsed`.
    pub fn to_response_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut body = match &self.raw {
            serde_json::Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        if let Some(parsed) = &self.parsed {
            body.insert("parsed".to_string(), serde_json::to_value(parsed)?);
        }
        Ok(serde_json::Value::Object(body))
    }
}
