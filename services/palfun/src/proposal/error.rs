use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("Invalid input")]
    InvalidInput,

    /// Upstream answered with a non-success status; body is kept verbatim.
    #[error("upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ProposalError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ProposalError::InvalidInput)
    }
}
