//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store and accessor against their invariants
//! over random operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheAside, CacheKey, CacheStore, Invalidation};

// == Test Configuration ==
const TTL: Duration = Duration::from_secs(600);
const NAMESPACES: [&str; 3] = ["restaurants", "books", "menu_items"];

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

fn namespace_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(NAMESPACES.to_vec()).prop_map(str::to_string))
}

#[derive(Debug, Clone)]
enum StoreOp {
    Insert { key: String, namespace: Option<String> },
    Get { key: String },
    InvalidateKey { key: String },
    InvalidateNamespace { namespace: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), namespace_strategy())
            .prop_map(|(key, namespace)| StoreOp::Insert { key, namespace }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
        key_strategy().prop_map(|key| StoreOp::InvalidateKey { key }),
        prop::sample::select(NAMESPACES.to_vec())
            .prop_map(|ns| StoreOp::InvalidateNamespace { namespace: ns.to_string() }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Size never exceeds capacity, and the namespace index always agrees with
    // the namespace recorded on each entry.
    #[test]
    fn prop_capacity_and_index_consistency(
        capacity in 1usize..6,
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store: CacheStore<String> = CacheStore::new(capacity);

        for op in ops {
            match op {
                StoreOp::Insert { key, namespace } => {
                    store.insert(key.clone(), key, TTL, namespace.as_deref());
                }
                StoreOp::Get { key } => {
                    store.get(&key);
                }
                StoreOp::InvalidateKey { key } => {
                    store.invalidate_key(&key);
                }
                StoreOp::InvalidateNamespace { namespace } => {
                    store.invalidate_namespace(&namespace);
                }
            }

            prop_assert!(store.len() <= capacity);

            for ns in NAMESPACES {
                let indexed = store.namespace_keys(ns);
                for key in &indexed {
                    let entry = store.peek(key);
                    prop_assert!(entry.map(|e| e.in_namespace(ns)).unwrap_or(false));
                }
                let tagged = store
                    .stats()
                    .keys
                    .into_iter()
                    .filter(|k| store.peek(k).map(|e| e.in_namespace(ns)).unwrap_or(false))
                    .count();
                prop_assert_eq!(tagged, indexed.len());
            }
        }
    }

    // The store behaves like a plain map as long as it never fills up.
    #[test]
    fn prop_matches_model_below_capacity(
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store: CacheStore<String> = CacheStore::new(1000);
        let mut model: HashMap<String, Option<String>> = HashMap::new();

        for op in ops {
            match op {
                StoreOp::Insert { key, namespace } => {
                    store.insert(key.clone(), key.clone(), TTL, namespace.as_deref());
                    model.insert(key, namespace);
                }
                StoreOp::Get { key } => {
                    let expected = model.contains_key(&key).then(|| key.clone());
                    prop_assert_eq!(store.get(&key), expected);
                }
                StoreOp::InvalidateKey { key } => {
                    let expected = usize::from(model.remove(&key).is_some());
                    prop_assert_eq!(store.invalidate_key(&key), expected);
                }
                StoreOp::InvalidateNamespace { namespace } => {
                    let before = model.len();
                    model.retain(|_, ns| ns.as_deref() != Some(namespace.as_str()));
                    prop_assert_eq!(store.invalidate_namespace(&namespace), before - model.len());
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // Filling a cache of capacity N with N + 1 distinct keys evicts exactly
    // the least recently used one.
    #[test]
    fn prop_lru_eviction_order(
        capacity in 1usize..8,
        touched in 0usize..8
    ) {
        let mut store: CacheStore<u32> = CacheStore::new(capacity);
        for i in 0..capacity {
            store.insert(format!("k{}", i), i as u32, TTL, None);
        }

        let touched = touched % capacity;
        store.get(&format!("k{}", touched));

        let expected = if capacity == 1 {
            "k0".to_string()
        } else if touched == 0 {
            "k1".to_string()
        } else {
            "k0".to_string()
        };

        let evicted = store.insert("new".to_string(), 99, TTL, None);
        prop_assert_eq!(evicted, Some(expected));
        prop_assert_eq!(store.len(), capacity);
        prop_assert_eq!(store.stats().evictions, 1);
    }

    // Distinct argument lists never render the same key.
    #[test]
    fn prop_keys_do_not_collide(
        a in prop::collection::vec("[a-z:\\\\]{0,4}", 0..4),
        b in prop::collection::vec("[a-z:\\\\]{0,4}", 0..4)
    ) {
        let render = |args: &[String]| {
            args.iter()
                .fold(CacheKey::new("op"), |key, arg| key.arg(arg))
                .into_string()
        };
        prop_assert_eq!(render(&a) == render(&b), a == b);
    }

    // After a successful write returns, every read of an invalidated key
    // reloads from the source.
    #[test]
    fn prop_no_stale_read_after_write(
        keys in prop::collection::vec(key_strategy(), 1..10),
        target in key_strategy()
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache: CacheAside<String> = CacheAside::new(64);
            for key in keys.iter().chain(std::iter::once(&target)) {
                let value = format!("old-{}", key);
                cache.read(key.as_str(), None, TTL, || async move { Ok(value) }).await.unwrap();
            }

            cache
                .write(&Invalidation::none().key(target.clone()), || async { Ok(()) })
                .await
                .unwrap();

            let fresh = cache
                .read(target.as_str(), None, TTL, || async { Ok("new".to_string()) })
                .await
                .unwrap();
            prop_assert_eq!(fresh, "new");
            Ok(())
        })?;
    }
}

// == Concurrent Access ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_and_writes_keep_capacity() {
        let cache: Arc<CacheAside<String>> = Arc::new(CacheAside::new(8));
        let loads = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for task in 0..16u32 {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            handles.push(tokio::spawn(async move {
                for i in 0..50u32 {
                    let key = CacheKey::new("get_item").arg((task * 7 + i) % 20);
                    if i % 10 == 9 {
                        cache
                            .write(&Invalidation::none().key(key).namespace("items"), || async {
                                Ok(())
                            })
                            .await
                            .unwrap();
                        continue;
                    }
                    let loads = Arc::clone(&loads);
                    let expected = key.to_string();
                    let value = cache
                        .read(key, Some("items"), TTL, || async move {
                            loads.fetch_add(1, Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            Ok(expected)
                        })
                        .await
                        .unwrap();
                    assert!(value.starts_with("get_item:"));
                }
            }));
        }

        for handle in handles {
            handle.await.expect("task should not panic");
        }

        let stats = cache.stats().await;
        assert!(stats.count <= 8);
        assert_eq!(stats.loads as usize, loads.load(Ordering::SeqCst));
        assert_eq!(stats.hits + stats.misses, 16 * 45);
    }
}
