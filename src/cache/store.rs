//! Cache Store Module
//!
//! Bounded map of cache entries combining TTL expiry, LRU eviction and a
//! namespace index for group invalidation.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Entry storage with LRU eviction, lazy TTL expiry and a
/// namespace -> keys reverse index.
///
/// `len() <= capacity()` holds after every operation.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Member keys per namespace
    namespaces: HashMap<String, HashSet<String>>,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries allowed (at least 1)
    capacity: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            namespaces: HashMap::new(),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Insert ==
    /// Stores `value` under `key` until `ttl` elapses.
    ///
    /// Re-inserting a key replaces the entry and restarts its ttl. Inserting a
    /// new key into a full store evicts the least recently used entry first.
    /// Returns the evicted key, if any.
    pub fn insert(
        &mut self,
        key: String,
        value: V,
        ttl: Duration,
        namespace: Option<&str>,
    ) -> Option<String> {
        let mut evicted = None;

        if let Some(previous) = self.entries.remove(&key) {
            self.unlink_namespace(&key, previous.namespace.as_deref());
        } else if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.unlink(&oldest);
                self.stats.record_eviction();
                evicted = Some(oldest);
            }
        }

        if let Some(ns) = namespace {
            self.namespaces
                .entry(ns.to_string())
                .or_default()
                .insert(key.clone());
        }

        let entry = CacheEntry::new(value, ttl, namespace.map(str::to_string));
        self.lru.touch(&key);
        self.entries.insert(key, entry);
        evicted
    }

    // == Get ==
    /// Returns the live value under `key`, marking it most recently used.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Looks at an entry without affecting recency or counters.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Invalidation ==
    /// Removes one key. Returns the number of entries removed (0 or 1).
    pub fn invalidate_key(&mut self, key: &str) -> usize {
        let removed = usize::from(self.remove_entry(key).is_some());
        self.stats.record_invalidations(removed);
        removed
    }

    /// Removes every entry stored under `namespace`. Repeating the call is a
    /// no-op that returns 0.
    pub fn invalidate_namespace(&mut self, namespace: &str) -> usize {
        let Some(members) = self.namespaces.remove(namespace) else {
            return 0;
        };

        for key in &members {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        self.stats.record_invalidations(members.len());
        members.len()
    }

    /// Removes everything. Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.namespaces.clear();
        self.lru.clear();
        self.stats.record_invalidations(removed);
        removed
    }

    // == Purge Expired ==
    /// Removes entries whose ttl has elapsed; live entries are untouched.
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Load Accounting ==
    pub fn record_load(&mut self, ok: bool) {
        self.stats.record_load(ok);
    }

    // == Stats ==
    /// Counters plus the keys that would currently be served.
    ///
    /// Entries past their deadline but not yet swept are left out of `count`
    /// and `keys`.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut stats = self.stats.clone();
        stats.keys = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        stats.keys.sort();
        stats.count = stats.keys.len();
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys currently indexed under `namespace`, sorted.
    pub fn namespace_keys(&self, namespace: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .namespaces
            .get(namespace)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    // == Internal ==
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.unlink_namespace(key, entry.namespace.as_deref());
        Some(entry)
    }

    /// Drops an entry the LRU tracker already forgot.
    fn unlink(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.unlink_namespace(key, entry.namespace.as_deref());
        }
    }

    fn unlink_namespace(&mut self, key: &str, namespace: Option<&str>) {
        let Some(ns) = namespace else { return };
        if let Some(members) = self.namespaces.get_mut(ns) {
            members.remove(key);
            if members.is_empty() {
                self.namespaces.remove(ns);
            }
        }
    }
}
