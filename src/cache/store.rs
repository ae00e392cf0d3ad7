//! Response cache abstraction and its in-memory implementation.
//!
//! The store is process-wide but never global: build one at startup and hand
//! it to the [`ConfidenceRouter`](crate::agent::ConfidenceRouter) explicitly.

use moka::ops::compute::Op;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::error::CacheResult;
use super::key::CacheKey;
use super::types::CacheEntry;
use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS};
use crate::query::QueryContext;

/// Keyed store of previously computed answers.
///
/// Reads and writes of one key are linearisable. There is no cross-key
/// transaction and no stampede protection: two concurrent misses on the same
/// key may both compute and both write, and the last write wins.
pub trait ResponseCache<V>: Send + Sync {
    /// Returns the live value for `key`, evicting it if it has expired.
    fn get_by_key(&self, key: &CacheKey) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set_by_key(&self, key: CacheKey, value: V);

    /// Number of entries currently held (expired ones included until read).
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `query` under a class name and context.
    ///
    /// Fails only when `class` is not a known query class.
    fn get(&self, query: &str, class: &str, context: &QueryContext) -> CacheResult<Option<V>> {
        let key = CacheKey::parse(query, class, context)?;
        Ok(self.get_by_key(&key))
    }

    /// Stores `value` for `query` under a class name and context.
    ///
    /// Fails only when `class` is not a known query class.
    fn set(&self, query: &str, value: V, class: &str, context: &QueryContext) -> CacheResult<()> {
        let key = CacheKey::parse(query, class, context)?;
        self.set_by_key(key, value);
        Ok(())
    }
}

/// Capacity-bounded in-memory cache with time-based expiry.
///
/// Expiry is checked on the read path: an entry whose age is at least the TTL
/// is removed in the same atomic step that reports the miss. Capacity bounds
/// growth from entries that are never read again.
pub struct InMemoryResponseCache<V> {
    entries: Cache<CacheKey, Arc<CacheEntry<V>>>,
    ttl: Duration,
}

impl<V> InMemoryResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }

    /// Raw presence check that ignores expiry. Test and diagnostics aid.
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<V> {
        let ttl = self.ttl;
        let mut hit = None;

        self.entries
            .entry(key.clone())
            .and_compute_with(|current| match current {
                Some(entry) if entry.value().is_expired(now, ttl) => {
                    debug!(
                        key_hash = key.fingerprint(),
                        age_ms = entry.value().age(now).as_millis() as u64,
                        "Cache entry expired, evicting"
                    );
                    Op::Remove
                }
                Some(entry) => {
                    hit = Some(entry.value().value.clone());
                    Op::Nop
                }
                None => Op::Nop,
            });

        hit
    }
}

impl<V> Default for InMemoryResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}

impl<V> ResponseCache<V> for InMemoryResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn get_by_key(&self, key: &CacheKey) -> Option<V> {
        let hit = self.get_at(key, Instant::now());
        debug!(
            key_hash = key.fingerprint(),
            hit = hit.is_some(),
            "Response cache lookup"
        );
        hit
    }

    fn set_by_key(&self, key: CacheKey, value: V) {
        debug!(key_hash = key.fingerprint(), "Response cache store");
        self.entries.insert(key, Arc::new(CacheEntry::new(value)));
    }

    fn len(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl<V> std::fmt::Debug for InMemoryResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryResponseCache")
            .field("entries", &self.entries.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}
