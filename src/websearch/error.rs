//! Web search error types.

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum WebSearchError {
    /// No search API key was configured.
    #[error("web search API key is not configured")]
    MissingApiKey,

    /// The HTTP request failed before a response arrived.
    #[error("web search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The search API answered with a non-success status.
    #[error("web search returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Summarising the results failed.
    #[error("web answer generation failed: {0}")]
    Generation(#[from] LlmError),
}

pub type WebSearchResult<T> = Result<T, WebSearchError>;
