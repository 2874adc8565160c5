//! Cache Module
//!
//! Cache-aside layer: TTL expiration, LRU eviction and key/namespace
//! invalidation in front of a data source.

mod accessor;
mod entry;
mod key;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use accessor::CacheAside;
pub use entry::CacheEntry;
pub use key::{CacheKey, Invalidation};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
