use thiserror::Error;

use crate::processing::checkpoint::CheckpointError;
use crate::processing::chunker::ChunkError;
use crate::processing::classify::ClassifyError;
use crate::processing::normalize::NormalizeError;
use crate::types::backend::BackendError;

/// Crate-level error type.
///
/// Callers receive either a complete [`crate::types::SummaryOutput`] or
/// exactly one of these; partial summaries are never returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The input was empty or whitespace-only. Checked before any
    /// classification or backend work happens.
    #[error("no text to summarize")]
    EmptyInput,

    /// Classification failed. The classifier is total, so this indicates an
    /// internal problem (a pattern that failed to compile) rather than bad
    /// input.
    #[error("classification error: {0}")]
    Classification(String),

    /// Normalization pattern setup failed
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Completeness pattern setup failed
    #[error("validation error: {0}")]
    Validation(String),

    /// A backend call failed with a non-retryable error
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Every retry of a backend call failed. Carries the last underlying
    /// cause.
    #[error("all {attempts} attempts failed: {source}")]
    AllAttemptsFailed {
        /// How many times the call was attempted
        attempts: u32,
        /// The error from the final attempt
        #[source]
        source: BackendError,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ClassifyError> for Error {
    fn from(err: ClassifyError) -> Self {
        Error::Classification(err.to_string())
    }
}

impl From<CheckpointError> for Error {
    fn from(err: CheckpointError) -> Self {
        Error::Validation(err.to_string())
    }
}
