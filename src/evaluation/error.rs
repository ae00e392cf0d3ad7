//! Evaluation error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::llm::LlmError;
use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
pub enum EvaluationError {
    /// No reference text was supplied or could be found.
    #[error("no ground truth available to evaluate against")]
    MissingGroundTruth,

    /// The judge model call failed.
    #[error("judge model failed: {0}")]
    Judge(#[from] LlmError),

    /// The judge replied without a usable score.
    #[error("judge reply has no score in [0, 1]: {reply}")]
    UnparseableScore { reply: String },

    /// Reference passages could not be fetched.
    #[error("ground truth lookup failed: {0}")]
    Retrieval(#[from] RetrievalError),

    /// An evaluation record could not be persisted.
    #[error("failed to write evaluation log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise evaluation record: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
