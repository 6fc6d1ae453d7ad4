//! Error types for the proposal workflow

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KreditsError {
    #[error("No contributor found for {0}")]
    ContributorNotFound(String),

    #[error("Contributor directory unavailable: {0:#}")]
    DirectoryUnavailable(anyhow::Error),

    #[error("Proposal submission failed: {0:#}")]
    ProposalSubmissionFailed(anyhow::Error),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

pub type KreditsResult<T> = Result<T, KreditsError>;
