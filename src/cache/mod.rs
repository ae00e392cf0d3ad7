//! Response cache keyed by query semantics.
//!
//! A question is only interchangeable with another when the text, the
//! [`QueryClass`](crate::query::QueryClass) and the disambiguating context all
//! agree. [`CacheKey`] encodes that rule; [`ResponseCache`] stores answers
//! under it with read-path expiry.

pub mod error;
pub mod key;
pub mod store;
pub mod types;


pub use error::{CacheError, CacheResult};
pub use key::CacheKey;
pub use store::{InMemoryResponseCache, ResponseCache};
pub use types::{
    CacheEntry, CacheStatus, DOCENT_STATUS_ERROR, DOCENT_STATUS_HEADER, DOCENT_STATUS_HEALTHY,
    DOCENT_STATUS_NOT_READY, DOCENT_STATUS_READY, DOCENT_STATUS_STORED,
};
