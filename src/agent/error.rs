//! Agent error types.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors surfaced by [`ConfidenceRouter::run`](super::ConfidenceRouter::run).
///
/// `UpstreamUnavailable` is recovered inside a run (the failing step is
/// replaced by a degraded placeholder) and only appears in logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    /// Caller supplied something the engine cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A collaborator failed.
    #[error("{component} unavailable: {message}")]
    UpstreamUnavailable {
        component: &'static str,
        message: String,
    },

    /// Nothing is indexed and no cached answer exists.
    #[error("No data available. Upload files or submit URLs first.")]
    NoData,
}

impl From<CacheError> for AgentError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::InvalidArgument { class } => {
                AgentError::InvalidArgument(format!("unknown query class '{}'", class))
            }
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
