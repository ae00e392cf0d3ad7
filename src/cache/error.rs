use thiserror::Error;

use crate::query::UnknownQueryClass;

/// Errors raised by cache key construction.
///
/// Lookups and stores never fail for a valid query class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The query class is not one of `document`, `sql`, `web`.
    #[error("invalid argument: unknown query class '{class}'")]
    InvalidArgument { class: String },
}

impl From<UnknownQueryClass> for CacheError {
    fn from(err: UnknownQueryClass) -> Self {
        CacheError::InvalidArgument { class: err.0 }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
