//! Error types for sentiscore-engine
//!
//! Three severities:
//! - [`RowScoringError`]: one review could not be scored; recovered locally with the fallback score
//! - [`BatchError::ChunkExecution`]: an execution unit failed; fatal to the batch once retries run out
//! - [`BatchError::MissingField`] / [`BatchError::InvalidWorkerCount`]: rejected before any scoring starts

use thiserror::Error;

/// Failure reported by an external oracle
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OracleError {
    /// Lexical polarity analyzer failed
    #[error("lexical oracle failed: {0}")]
    Lexical(String),

    /// Toxicity classifier failed
    #[error("toxicity oracle failed: {0}")]
    Toxicity(String),
}

/// Failure while computing a single review's score
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowScoringError {
    /// An oracle call returned an error
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// An oracle returned a value outside its contract
    #[error("{oracle} oracle returned invalid output: {detail}")]
    InvalidOracleOutput {
        oracle: &'static str,
        detail: String,
    },

    /// An oracle panicked while scoring this row
    #[error("scoring panicked: {0}")]
    Panicked(String),
}

/// Batch-level error
#[derive(Debug, Error)]
pub enum BatchError {
    /// Required input field missing (configuration error, raised before scoring)
    #[error("Input table is missing required field '{0}'")]
    MissingField(String),

    /// Worker count must be at least 1
    #[error("Invalid worker count {0}: must be >= 1")]
    InvalidWorkerCount(usize),

    /// An execution unit failed and retries were exhausted
    #[error("Chunk {chunk_index} failed after {attempts} attempt(s): {reason}")]
    ChunkExecution {
        chunk_index: usize,
        attempts: u32,
        reason: String,
    },

    /// sentiscore-common error
    #[error("Common error: {0}")]
    Common(#[from] sentiscore_common::Error),
}

/// Result type for batch operations
pub type ScoringResult<T> = Result<T, BatchError>;
