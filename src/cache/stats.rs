//! Cache Statistics Module
//!
//! Counters for cache traffic plus a point-in-time view of the store contents.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache activity and occupancy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads served from the cache
    pub hits: u64,
    /// Reads that found nothing usable (absent or expired)
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries dropped because their ttl elapsed
    pub expirations: u64,
    /// Entries dropped by explicit key or namespace invalidation
    pub invalidations: u64,
    /// Loader invocations that succeeded
    pub loads: u64,
    /// Loader invocations that failed
    pub load_failures: u64,
    /// Current number of entries
    pub count: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Keys currently stored, sorted
    pub keys: Vec<String>,
}

impl CacheStats {
    /// Creates empty counters for a cache of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn record_load(&mut self, ok: bool) {
        if ok {
            self.loads += 1;
        } else {
            self.load_failures += 1;
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new(64);
        assert_eq!(stats.capacity, 64);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.count, 0);
        assert!(stats.keys.is_empty());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new(1).hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new(1);
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_removal_counters() {
        let mut stats = CacheStats::new(1);
        stats.record_eviction();
        stats.record_expirations(3);
        stats.record_invalidations(2);
        stats.record_invalidations(0);

        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 3);
        assert_eq!(stats.invalidations, 2);
    }

    #[test]
    fn test_load_counters() {
        let mut stats = CacheStats::new(1);
        stats.record_load(true);
        stats.record_load(false);
        stats.record_load(true);

        assert_eq!(stats.loads, 2);
        assert_eq!(stats.load_failures, 1);
    }
}
