//! Argument sets for the settlement program's instructions
//!
//! - create: built from a normalized proposal plus the creator's stake and deadline
//! - join: side and stake against an existing pal
//! - resolve: oracle price threshold
//! - claim: only the pal address
//!
//! Nothing here signs or submits a transaction.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::proposal::BetProposalResult;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const MIN_STAKE_SOL: f64 = 0.001;
pub const MIN_STATEMENT_CHARS: usize = 10;
pub const DEFAULT_CONFIDENCE: u8 = 80;
pub const DEFAULT_DEADLINE_HOURS: i64 = 24;
/// Price with 8 decimals (180.00000000).
pub const DEFAULT_RESOLVE_THRESHOLD: i64 = 180_00000000;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("proposal is not feasible (feasible = {0:?})")]
    NotFeasible(String),
    #[error("statement must be longer than {} characters", MIN_STATEMENT_CHARS)]
    StatementTooShort,
    #[error("verification URL must start with http: {0:?}")]
    InvalidVerificationUrl(String),
    #[error("confidence must be between 0 and 100, got {0}")]
    ConfidenceOutOfRange(f64),
    #[error("stake must be at least {} SOL, got {0}", MIN_STAKE_SOL)]
    StakeTooSmall(f64),
    #[error("deadline {0} is in the past")]
    DeadlineInPast(i64),
    #[error("not a pal account address: {0:?}")]
    InvalidPalAddress(String),
    #[error("threshold must be a positive integer, got {0:?}")]
    InvalidThreshold(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalDraft {
    pub statement: String,
    pub verification_url: String,
    /// Always empty; reserved by the program for an image hash.
    pub image_hash: String,
    pub confidence_score: u8,
    /// Unix seconds.
    pub deadline: i64,
    pub stake_lamports: u64,
}

impl PalDraft {
    /// Deadline defaults to 24h from `now` when not given.
    pub fn from_proposal(
        proposal: &BetProposalResult,
        stake_sol: f64,
        deadline: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Self, DraftError> {
        if !proposal.is_feasible() {
            return Err(DraftError::NotFeasible(proposal.feasible.clone()));
        }

        if proposal.statement.chars().count() <= MIN_STATEMENT_CHARS {
            return Err(DraftError::StatementTooShort);
        }

        if !proposal.verification_url.starts_with("http") {
            return Err(DraftError::InvalidVerificationUrl(proposal.verification_url.clone()));
        }

        let confidence_score = resolve_confidence(proposal)?;
        let stake_lamports = sol_to_lamports(stake_sol)?;

        let deadline = match deadline {
            Some(ts) if ts <= now.timestamp() => return Err(DraftError::DeadlineInPast(ts)),
            Some(ts) => ts,
            None => (now + Duration::hours(DEFAULT_DEADLINE_HOURS)).timestamp(),
        };

        Ok(Self {
            statement: proposal.statement.clone(),
            verification_url: proposal.verification_url.clone(),
            image_hash: String::new(),
            confidence_score,
            deadline,
            stake_lamports,
        })
    }
}

/// Arguments for joining an existing pal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDraft {
    pub pal: String,
    /// `true` backs the statement, `false` bets against it.
    pub side: bool,
    pub stake_lamports: u64,
    pub message: String,
}

impl JoinDraft {
    pub fn new(pal: &str, side: bool, stake_sol: f64, message: &str) -> Result<Self, DraftError> {
        Ok(Self {
            pal: pal_address(pal)?,
            side,
            stake_lamports: sol_to_lamports(stake_sol)?,
            message: message.to_string(),
        })
    }
}

/// Arguments for resolving a price pal against the oracle feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveDraft {
    pub pal: String,
    pub threshold: i64,
}

impl ResolveDraft {
    /// Missing or blank `threshold` falls back to `DEFAULT_RESOLVE_THRESHOLD`.
    pub fn new(pal: &str, threshold: Option<&str>) -> Result<Self, DraftError> {
        Ok(Self {
            pal: pal_address(pal)?,
            threshold: parse_threshold(threshold)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDraft {
    pub pal: String,
}

impl ClaimDraft {
    pub fn new(pal: &str) -> Result<Self, DraftError> {
        Ok(Self { pal: pal_address(pal)? })
    }
}

/// Base58 text of a 32-byte account key.
fn pal_address(pal: &str) -> Result<String, DraftError> {
    let pal = pal.trim();
    let valid = (32..=44).contains(&pal.len()) && pal.chars().all(|c| BASE58_ALPHABET.contains(c));
    if !valid {
        return Err(DraftError::InvalidPalAddress(pal.to_string()));
    }
    Ok(pal.to_string())
}

/// Digits with optional `_` separators, e.g. `180_00000000`.
fn parse_threshold(threshold: Option<&str>) -> Result<i64, DraftError> {
    let raw = match threshold.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_RESOLVE_THRESHOLD),
        Some(raw) => raw,
    };

    match raw.replace('_', "").parse::<i64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(DraftError::InvalidThreshold(raw.to_string())),
    }
}

fn resolve_confidence(proposal: &BetProposalResult) -> Result<u8, DraftError> {
    if proposal.confidence.is_empty() {
        return Ok(DEFAULT_CONFIDENCE);
    }
    match proposal.confidence.as_f64() {
        Some(v) if (0.0..=100.0).contains(&v) => Ok(v.floor() as u8),
        Some(v) => Err(DraftError::ConfidenceOutOfRange(v)),
        None => Ok(DEFAULT_CONFIDENCE),
    }
}

/// Floor of `stake_sol * 1e9`; rejects stakes under the program minimum.
pub fn sol_to_lamports(stake_sol: f64) -> Result<u64, DraftError> {
    if !stake_sol.is_finite() || stake_sol < MIN_STAKE_SOL {
        return Err(DraftError::StakeTooSmall(stake_sol));
    }
    Ok((stake_sol * LAMPORTS_PER_SOL as f64).floor() as u64)
}
