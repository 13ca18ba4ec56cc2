//! Time-to-live cache shared by the data fetchers.
//!
//! Entries are stamped with the time they were stored and read back only while
//! `now - cached_at < ttl`. Stale entries are dropped lazily on the next lookup;
//! nothing sweeps the map in the background.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;

/// Internal cache entry with timestamp
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.cached_at < self.ttl
    }

    /// Return the cached value if it is still fresh. A stale entry is removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let fresh = match self.entries.get(key) {
            None => return None,
            Some(entry) => {
                if self.is_fresh(&entry, now) {
                    Some(entry.data.clone())
                } else {
                    None
                }
            }
        };

        if fresh.is_none() {
            // Another writer may have refreshed the key in between.
            if self.evict_if_stale(key, now) {
                tracing::debug!("Cache entry for {} expired", key);
            }
        }
        fresh
    }

    /// Remove `key` only if it is still stale at `now`; true when something was removed.
    fn evict_if_stale(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .remove_if(key, |_, entry| !self.is_fresh(entry, now))
            .is_some()
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data: value,
                cached_at: self.clock.now(),
            },
        );
    }

    /// Fresh cached value for `key`, or the result of `fetch` (stored on success).
    ///
    /// Errors are passed through and never cached. Two callers racing on the
    /// same key may both fetch; the last write wins.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let value = fetch().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|(_, entry)| entry.data)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, stale ones included until they are looked up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with_clock(ttl_secs: i64) -> (TtlCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = TtlCache::with_clock(Duration::seconds(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_round_trip_within_ttl() {
        let (cache, clock) = cache_with_clock(300);
        cache.set("stocks", "v1".to_string());

        clock.advance(Duration::seconds(299));
        assert_eq!(cache.get("stocks").as_deref(), Some("v1"));
    }

    #[test]
    fn test_expires_at_ttl_boundary_and_evicts() {
        let (cache, clock) = cache_with_clock(300);
        cache.set("stocks", "v1".to_string());

        clock.advance(Duration::seconds(300));
        assert_eq!(cache.get("stocks"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_entries_linger_until_looked_up() {
        let (cache, clock) = cache_with_clock(60);
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());

        clock.advance(Duration::seconds(120));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_keeps_a_refreshed_entry() {
        let (cache, clock) = cache_with_clock(60);
        cache.set("k", "old".to_string());
        clock.advance(Duration::seconds(60));

        // Refreshed between a stale lookup and its eviction
        cache.set("k", "new".to_string());
        assert!(!cache.evict_if_stale("k", clock.now()));
        assert_eq!(cache.get("k").as_deref(), Some("new"));

        clock.advance(Duration::seconds(60));
        assert!(cache.evict_if_stale("k", clock.now()));
        assert!(!cache.evict_if_stale("k", clock.now()));
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = cache_with_clock(60);
        cache.set("k", "old".to_string());
        clock.advance(Duration::seconds(50));
        cache.set("k", "new".to_string());
        clock.advance(Duration::seconds(50));
        assert_eq!(cache.get("k").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_get_or_fetch_repopulates_after_expiry() {
        let (cache, clock) = cache_with_clock(300);
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let fetch = move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok::<_, String>(format!("fetch-{}", n))
        };

        assert_eq!(cache.get_or_fetch("news", fetch).await.unwrap(), "fetch-1");
        assert_eq!(cache.get_or_fetch("news", fetch).await.unwrap(), "fetch-1");
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(301));
        assert_eq!(cache.get("news"), None);
        assert_eq!(cache.get_or_fetch("news", fetch).await.unwrap(), "fetch-2");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let (cache, _clock) = cache_with_clock(300);
        let result = tokio_test::block_on(
            cache.get_or_fetch("news", || async { Err::<String, _>("boom") }),
        );
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty());

        let value = tokio_test::block_on(
            cache.get_or_fetch("news", || async { Ok::<_, &str>("fresh".to_string()) }),
        );
        tokio_test::assert_ok!(&value);
        assert_eq!(cache.get("news").as_deref(), Some("fresh"));
    }
}
