//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheAside;

/// Spawns a background task that sweeps expired entries out of `cache`
/// every `interval`.
///
/// Reads already ignore expired entries, so the sweep only reclaims memory
/// early; it never removes an entry before its deadline.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheAside::<String>::new(1000));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: Arc<CacheAside<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn populate(cache: &CacheAside<String>, key: &str, ttl: Duration) {
        cache
            .read(key, None, ttl, || async { Ok("value".to_string()) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache: Arc<CacheAside<String>> = Arc::new(CacheAside::new(100));
        populate(&cache, "expire_soon", Duration::from_millis(50)).await;

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.count, 0, "expired entry should have been swept");
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1, "only the populating read counts as a miss");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache: Arc<CacheAside<String>> = Arc::new(CacheAside::new(100));
        populate(&cache, "long_lived", Duration::from_secs(3600)).await;

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.keys, vec!["long_lived".to_string()]);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache: Arc<CacheAside<String>> = Arc::new(CacheAside::new(100));

        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
