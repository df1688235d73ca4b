//! Bet proposal pipeline
//!
//! Free-text bet idea → upstream completion → tolerant JSON extraction →
//! single verification URL → `BetProposalResult`.

pub mod error;
pub mod extract;
pub mod normalizer;
pub mod prompt;
pub mod types;

pub use error::ProposalError;
pub use extract::{extract_first_url, extract_proposal};
pub use normalizer::ProposalNormalizer;
pub use types::{BetProposalRequest, BetProposalResult, Confidence, NormalizedProposal};
