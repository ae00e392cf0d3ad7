use std::time::{Duration, Instant};

pub const DOCENT_STATUS_HEADER: &str = "X-Docent-Status";
pub const DOCENT_STATUS_HEALTHY: &str = "healthy";
pub const DOCENT_STATUS_READY: &str = "ready";
pub const DOCENT_STATUS_NOT_READY: &str = "not_ready";
pub const DOCENT_STATUS_STORED: &str = "stored";
pub const DOCENT_STATUS_ERROR: &str = "error";

/// Whether an answer was served from the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}

/// A stored answer and the instant it was created.
///
/// Entries are never updated in place; a refresh replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V) -> Self {
        Self::created_at(value, Instant::now())
    }

    pub fn created_at(value: V, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    /// Age relative to `now`; zero if `now` precedes creation.
    #[inline]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// `true` once `now - created_at >= ttl`.
    #[inline]
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }
}
