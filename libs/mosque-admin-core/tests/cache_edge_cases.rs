//! Cache edge case tests
//!
//! Capacity and expiry configuration, stale reads, invalidation racing an
//! in-flight fetch, and concurrent access.

use mosque_admin_core::test_utils::RecordingNotifier;
use mosque_admin_core::{
    build_query_key, QueryCache, QueryCacheConfig, QueryCacheStats, QueryClient, QueryParams,
    QuerySpec,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn key(root: &str, page: u32) -> mosque_admin_core::QueryKey {
    build_query_key(root, Some(QueryParams::new().with("page", page)))
}

/// Test cache stats hit rate calculation with zero hits/misses
#[test]
fn test_cache_stats_zero_hits_misses() {
    let mut stats = QueryCacheStats::default();
    stats.calculate_hit_rate();
    assert!(stats.hit_rate.abs() < f64::EPSILON);
}

/// Test hit rate after mixed reads
#[tokio::test]
async fn test_hit_rate_after_reads() {
    let cache = QueryCache::new_default();
    cache.set(key("events", 1), 1_u32).await;

    let _ = cache.get::<u32>(&key("events", 1)).await;
    let _ = cache.get::<u32>(&key("events", 1)).await;
    let _ = cache.get::<u32>(&key("events", 1)).await;
    let _ = cache.get::<u32>(&key("events", 2)).await;

    let stats = cache.get_stats();
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);

    cache.reset_stats();
    assert_eq!(cache.get_stats().hits, 0);
}

/// Test that entries expire after their time to live
#[tokio::test]
async fn test_entries_expire() {
    let cache = QueryCache::new(QueryCacheConfig {
        max_capacity: 10,
        ttl_secs: 1,
        tti_secs: 1,
    });
    cache.set(key("events", 1), 1_u32).await;
    assert_eq!(cache.get::<u32>(&key("events", 1)).await, Some(1));

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(cache.get::<u32>(&key("events", 1)).await, None);
}

/// Test that capacity bounds the number of entries
#[tokio::test]
async fn test_capacity_is_bounded() {
    let cache = QueryCache::new(QueryCacheConfig {
        max_capacity: 5,
        ..QueryCacheConfig::default()
    });
    for page in 0..50 {
        cache.set(key("events", page), page).await;
    }
    assert!(cache.entry_count().await <= 5);
}

/// Stale entries stay in the cache until they are overwritten
#[tokio::test]
async fn test_invalidation_keeps_entries_but_marks_them_stale() {
    let cache = QueryCache::new_default();
    cache.set(key("prayer-config", 1), 1_u32).await;

    cache.invalidate_prefix("prayer-config");

    assert!(cache.contains_key(&key("prayer-config", 1)));
    assert!(cache.is_stale(&key("prayer-config", 1)).await);
    assert_eq!(cache.get::<u32>(&key("prayer-config", 1)).await, None);
    assert_eq!(cache.get_stats().stale_reads, 1);

    cache.set(key("prayer-config", 1), 2_u32).await;
    assert_eq!(cache.get::<u32>(&key("prayer-config", 1)).await, Some(2));
}

/// A fetch that started before an invalidation is stored stale
#[tokio::test]
async fn test_invalidation_during_fetch_forces_refetch() {
    let client = QueryClient::new(QueryCache::new_default(), Arc::new(RecordingNotifier::new()));
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let spec = {
        let started = started.clone();
        let release = release.clone();
        QuerySpec::new(key("prayer-iqama", 1), move || {
            let started = started.clone();
            let release = release.clone();
            async move {
                started.notify_one();
                release.notified().await;
                Ok(vec![1_u32])
            }
        })
    };

    let fetch = {
        let client = client.clone();
        let spec = spec.clone();
        tokio::spawn(async move { client.fetch_query(&spec).await })
    };

    started.notified().await;
    client.invalidate("prayer-iqama");
    release.notify_one();

    assert!(fetch.await.unwrap().unwrap().is_fetched());
    assert!(client.cache().is_stale(&spec.key).await);
    assert!(client.fetch_query(&spec).await.unwrap().is_fetched());
}

/// A slow fetch from before an invalidation cannot overwrite a newer result
#[tokio::test]
async fn test_late_fetch_keeps_newer_result() {
    let client = QueryClient::new(QueryCache::new_default(), Arc::new(RecordingNotifier::new()));
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let slow = {
        let started = started.clone();
        let release = release.clone();
        QuerySpec::new(key("events", 1), move || {
            let started = started.clone();
            let release = release.clone();
            async move {
                started.notify_one();
                release.notified().await;
                Ok(1_u32)
            }
        })
    };
    let fast = QuerySpec::new(key("events", 1), || async { Ok(2_u32) });

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.fetch_query(&slow).await })
    };
    started.notified().await;
    client.invalidate("events");
    assert!(client.fetch_query(&fast).await.unwrap().is_fetched());

    release.notify_one();
    assert!(pending.await.unwrap().unwrap().is_fetched());

    assert!(!client.cache().is_stale(&fast.key).await);
    assert_eq!(client.fetch_query(&fast).await.unwrap().into_data(), Some(2));
}

/// Concurrent readers and invalidators do not deadlock or panic
#[tokio::test]
async fn test_concurrent_access() {
    let cache = QueryCache::new_default();
    let mut handles = Vec::new();

    for i in 0..20_u32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let root = if i % 2 == 0 { "events" } else { "prayer-times" };
            cache.set(key(root, i), i).await;
            let _ = cache.get::<u32>(&key(root, i)).await;
            if i % 5 == 0 {
                cache.invalidate_prefix(root);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.get_stats().writes, 20);
    assert_eq!(cache.get_stats().invalidations, 4);
}
