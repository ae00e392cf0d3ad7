//! LLM error types.

use thiserror::Error;

/// Errors raised by an [`AnswerGenerator`](super::AnswerGenerator).
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// The provider rejected or failed the request.
    #[error("provider request failed for model '{model}': {message}")]
    Provider { model: String, message: String },

    /// The provider answered without any text content.
    #[error("provider returned an empty response for model '{model}'")]
    EmptyResponse { model: String },
}

/// Result type for LLM calls.
pub type LlmResult<T> = Result<T, LlmError>;
