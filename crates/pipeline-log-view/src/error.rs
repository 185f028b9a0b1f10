use crate::model::StepId;
use thiserror::Error;

/// Failure of the log-fetch collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no console log for step {0}")]
    NotFound(StepId),

    #[error("invalid byte range {start}..{end} for step {step_id}")]
    InvalidRange { step_id: StepId, start: u64, end: u64 },

    #[error("failed to read console log: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("chunk starts at byte {new_start}, buffer already starts at byte {current}")]
    NonMonotonicOffset { current: u64, new_start: u64 },
}
