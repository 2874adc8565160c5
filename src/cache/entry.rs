//! Cache Entry Module
//!
//! A cached payload together with its expiration deadline and the
//! namespace it was stored under.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value. Entries are replaced or removed, never mutated.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload
    pub value: V,
    /// Namespace tag used for coarse invalidation
    pub namespace: Option<String>,
    /// Population time on the monotonic clock
    pub created_at: Instant,
    /// Deadline on the monotonic clock; `None` when `created_at + ttl` is
    /// past what the clock can represent
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: V, ttl: Duration, namespace: Option<String>) -> Self {
        Self::new_at(value, ttl, namespace, Instant::now())
    }

    /// Creates an entry populated at `now`.
    pub fn new_at(value: V, ttl: Duration, namespace: Option<String>, now: Instant) -> Self {
        Self {
            value,
            namespace,
            created_at: now,
            expires_at: now.checked_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`, so a
    /// value is never served after its full ttl has elapsed.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired and `Duration::MAX` if it never expires.
    pub fn ttl_remaining(&self) -> Duration {
        match self.expires_at {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        }
    }

    /// Returns true if the entry was stored under `namespace`.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}
