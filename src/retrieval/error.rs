//! Retrieval error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::llm::LlmError;

/// Errors from document retrieval and the passage source behind it.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The passage source could not be queried.
    #[error("passage source unavailable: {0}")]
    SourceUnavailable(String),

    /// Answer generation failed.
    #[error("answer generation failed: {0}")]
    Generation(#[from] LlmError),

    /// A document could not be read from disk.
    #[error("failed to read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A submitted document had no indexable text.
    #[error("document '{source_label}' has no text to index")]
    EmptyDocument { source_label: String },
}

/// Result type for retrieval operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;
