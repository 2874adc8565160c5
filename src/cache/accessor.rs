//! Cache-Aside Accessor
//!
//! Wraps reads from a data source with a lookup in a shared [`CacheStore`],
//! and writes with explicit invalidation of the entries they make stale.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, Invalidation};
use crate::error::{CacheError, Result};

/// Store plus invalidation bookkeeping, guarded together.
#[derive(Debug)]
struct Shared<V> {
    store: CacheStore<V>,
    /// Bumped by every invalidation, whether or not it removed anything
    generation: u64,
    /// Generation of the last full clear
    cleared_at: u64,
    /// Generation of the last invalidation naming each key. Only kept while
    /// a load is in flight.
    key_marks: HashMap<String, u64>,
    /// Same as `key_marks`, per namespace
    namespace_marks: HashMap<String, u64>,
}

impl<V: Clone> Shared<V> {
    /// True if an invalidation covering `key` or `namespace` happened after
    /// generation `since`.
    fn invalidated_since(&self, since: u64, key: &str, namespace: Option<&str>) -> bool {
        let newer = |mark: Option<&u64>| mark.is_some_and(|&generation| generation > since);
        self.cleared_at > since
            || newer(self.key_marks.get(key))
            || newer(namespace.and_then(|ns| self.namespace_marks.get(ns)))
    }

    fn mark_cleared(&mut self) {
        self.generation += 1;
        self.cleared_at = self.generation;
        self.key_marks.clear();
        self.namespace_marks.clear();
    }
}

/// Counts a load as in flight until dropped, including on cancellation.
struct LoadGuard<'a>(&'a AtomicUsize);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// == Cache Aside ==
/// Read-through cache with write-side invalidation.
///
/// The lock is never held while a loader or mutator runs, so slow data
/// source calls do not serialize unrelated requests. Concurrent misses on
/// the same key each run their own loader.
#[derive(Debug)]
pub struct CacheAside<V> {
    shared: RwLock<Shared<V>>,
    /// Loads started and not yet finished or dropped
    loading: AtomicUsize,
}

impl<V: Clone> CacheAside<V> {
    // == Constructor ==
    /// Creates an accessor over an empty store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: RwLock::new(Shared {
                store: CacheStore::new(capacity),
                generation: 0,
                cleared_at: 0,
                key_marks: HashMap::new(),
                namespace_marks: HashMap::new(),
            }),
            loading: AtomicUsize::new(0),
        }
    }

    // == Read ==
    /// Returns the cached value under `key`, or runs `loader` once and caches
    /// its result for `ttl`.
    ///
    /// Loader errors are returned unchanged and nothing is cached. If an
    /// invalidation covering `key` or `namespace` completes while the loader
    /// is running, the loaded value is still returned but not stored, since it
    /// may predate that write. Unrelated invalidations do not block the store.
    pub async fn read<K, F, Fut>(
        &self,
        key: K,
        namespace: Option<&str>,
        ttl: Duration,
        loader: F,
    ) -> Result<V>
    where
        K: Into<String>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if ttl.is_zero() {
            return Err(CacheError::InvalidRequest(
                "cache ttl must be positive".to_string(),
            ));
        }
        let key = key.into();

        let (started_at, _load) = {
            let mut shared = self.shared.write().await;
            if let Some(value) = shared.store.get(&key) {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
            self.loading.fetch_add(1, Ordering::SeqCst);
            (shared.generation, LoadGuard(&self.loading))
        };

        debug!(key = %key, "cache miss, loading from source");
        let loaded = loader().await;

        let mut shared = self.shared.write().await;
        shared.store.record_load(loaded.is_ok());
        let value = match loaded {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "loader failed, nothing cached");
                return Err(err);
            }
        };

        if shared.invalidated_since(started_at, &key, namespace) {
            debug!(key = %key, "invalidated during load, skipping populate");
            return Ok(value);
        }

        if let Some(evicted) = shared.store.insert(key.clone(), value.clone(), ttl, namespace) {
            debug!(key = %key, evicted = %evicted, "evicted least recently used entry");
        }
        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache populated");
        Ok(value)
    }

    // == Write ==
    /// Runs `mutator`, then drops every entry named by `invalidation` before
    /// returning. A failed mutator changes nothing and invalidates nothing.
    pub async fn write<T, F, Fut>(&self, invalidation: &Invalidation, mutator: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match mutator().await {
            Ok(outcome) => {
                self.invalidate(invalidation).await;
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "mutator failed, cache left untouched");
                Err(err)
            }
        }
    }

    // == Invalidate ==
    /// Drops the keys and namespaces named by `invalidation`.
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, invalidation: &Invalidation) -> usize {
        if invalidation.is_empty() {
            return 0;
        }

        let mut shared = self.shared.write().await;
        let mut removed = 0;
        for key in invalidation.keys() {
            removed += shared.store.invalidate_key(key);
        }
        for namespace in invalidation.namespaces() {
            removed += shared.store.invalidate_namespace(namespace);
        }

        shared.generation += 1;
        if self.loading.load(Ordering::SeqCst) == 0 {
            shared.key_marks.clear();
            shared.namespace_marks.clear();
        } else {
            let generation = shared.generation;
            for key in invalidation.keys() {
                shared.key_marks.insert(key.to_string(), generation);
            }
            for namespace in invalidation.namespaces() {
                shared.namespace_marks.insert(namespace.to_string(), generation);
            }
        }

        info!(
            keys = ?invalidation.keys().collect::<Vec<_>>(),
            namespaces = ?invalidation.namespaces().collect::<Vec<_>>(),
            removed,
            "cache invalidated"
        );
        removed
    }

    // == Administration ==
    /// Drops everything.
    pub async fn clear_all(&self) -> usize {
        let mut shared = self.shared.write().await;
        let removed = shared.store.clear();
        shared.mark_cleared();
        info!(removed, "cache cleared");
        removed
    }

    /// Drops every entry in `namespace`. Clearing an empty namespace is a no-op.
    pub async fn clear_namespace(&self, namespace: &str) -> usize {
        self.invalidate(&Invalidation::none().namespace(namespace))
            .await
    }

    /// Removes entries whose ttl has already elapsed.
    pub async fn purge_expired(&self) -> usize {
        self.shared.write().await.store.purge_expired()
    }

    /// Snapshot of the counters and the keys currently served.
    pub async fn stats(&self) -> CacheStats {
        self.shared.read().await.store.stats()
    }

    // == Shutdown ==
    /// Empties the cache at shutdown and returns the final statistics.
    pub async fn drain(&self) -> CacheStats {
        let mut shared = self.shared.write().await;
        let stats = shared.store.stats();
        shared.store.clear();
        shared.mark_cleared();
        info!(
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            dropped = stats.count,
            "cache drained"
        );
        stats
    }
}
