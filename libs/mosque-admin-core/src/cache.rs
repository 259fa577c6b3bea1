//! Shared query cache with root-prefix invalidation
//!
//! The cache is an explicit service handed to every component that reads or
//! writes server state. Entries are type-erased and read back with a typed
//! getter. Invalidation never removes entries: each resource root carries a
//! generation counter, every entry remembers the generation it was written
//! under, and an entry whose generation is behind its root's reads as stale.

use crate::error::{AdminError, Result};
use crate::query_key::QueryKey;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound for TTL and TTI, one year
pub const MAX_EXPIRY_SECS: u64 = 365 * 24 * 60 * 60;

/// Query cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryCacheConfig {
    /// Maximum number of cached query results
    pub max_capacity: u64,
    /// Time to live for cached results, in seconds
    pub ttl_secs: u64,
    /// Time to idle for cached results, in seconds
    pub tti_secs: u64,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            ttl_secs: 1800, // 30 minutes
            tti_secs: 300,  // 5 minutes
        }
    }
}

impl QueryCacheConfig {
    /// Time to live, clamped to `1..=MAX_EXPIRY_SECS` seconds
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.clamp(1, MAX_EXPIRY_SECS))
    }

    /// Time to idle, clamped to `1..=MAX_EXPIRY_SECS` seconds
    #[must_use]
    pub fn tti(&self) -> Duration {
        Duration::from_secs(self.tti_secs.clamp(1, MAX_EXPIRY_SECS))
    }

    /// Check capacity and expiry bounds
    ///
    /// # Errors
    /// Returns a configuration error describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(AdminError::configuration(
                "Cache max capacity must be greater than 0",
            ));
        }
        if self.ttl_secs == 0 || self.ttl_secs > MAX_EXPIRY_SECS {
            return Err(AdminError::configuration(format!(
                "Cache TTL must be between 1 and {MAX_EXPIRY_SECS} seconds"
            )));
        }
        if self.tti_secs == 0 {
            return Err(AdminError::configuration(
                "Cache TTI must be greater than 0",
            ));
        }
        if self.tti_secs > self.ttl_secs {
            return Err(AdminError::configuration(
                "Cache TTI cannot exceed cache TTL",
            ));
        }
        Ok(())
    }
}

/// Query cache statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Reads that found an entry written before the latest invalidation
    pub stale_reads: u64,
    pub writes: u64,
    pub invalidations: u64,
    pub hit_rate: f64,
}

impl QueryCacheStats {
    pub fn calculate_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                self.hits as f64 / total as f64
            }
        } else {
            0.0
        };
    }
}

#[derive(Clone)]
struct CachedEntry {
    value: Arc<dyn Any + Send + Sync>,
    generation: u64,
    stored_at: DateTime<Utc>,
}

/// Process-wide cache of query results keyed by [`QueryKey`]
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, CachedEntry>,
    generations: Arc<DashMap<String, u64>>,
    stats: Arc<RwLock<QueryCacheStats>>,
    config: QueryCacheConfig,
}

impl QueryCache {
    /// Create a new query cache
    ///
    /// Out-of-range expiry settings are clamped, see [`QueryCacheConfig::ttl`].
    #[must_use]
    pub fn new(config: QueryCacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl())
            .time_to_idle(config.tti())
            .build();

        Self {
            entries,
            generations: Arc::new(DashMap::new()),
            stats: Arc::new(RwLock::new(QueryCacheStats::default())),
            config,
        }
    }

    /// Create a new query cache with default configuration
    #[must_use]
    pub fn new_default() -> Self {
        Self::new(QueryCacheConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    /// Current invalidation generation of a resource root
    #[must_use]
    pub fn generation(&self, root: &str) -> u64 {
        self.generations.get(root).map_or(0, |g| *g)
    }

    /// Fresh value stored under `key`
    ///
    /// Missing entries, entries written before the latest invalidation of the
    /// key's root, and entries of a different type all count as misses.
    pub async fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let Some(entry) = self.entries.get(key).await else {
            self.record_miss(false);
            debug!("Query cache miss: {}", key);
            return None;
        };

        if entry.generation < self.generation(key.root()) {
            self.record_miss(true);
            debug!(
                "Query cache stale: {} (stored at {})",
                key,
                entry.stored_at.to_rfc3339()
            );
            return None;
        }

        if let Some(value) = entry.value.downcast_ref::<T>() {
            self.record_hit();
            debug!("Query cache hit: {}", key);
            Some(value.clone())
        } else {
            self.record_miss(false);
            debug!("Query cache type mismatch: {}", key);
            None
        }
    }

    /// Store a value under the current generation of its root
    pub async fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let generation = self.generation(key.root());
        self.set_at_generation(key, value, generation).await;
    }

    /// Store a value that was fetched while `generation` was current
    ///
    /// If the root was invalidated while the fetch was in flight, the entry is
    /// written already stale and the next read refetches. A stored entry from
    /// a newer generation is never replaced.
    ///
    /// Returns whether the value was stored.
    pub async fn set_at_generation<T>(&self, key: QueryKey, value: T, generation: u64) -> bool
    where
        T: Send + Sync + 'static,
    {
        let label = key.to_string();
        let entry = CachedEntry {
            value: Arc::new(value),
            generation,
            stored_at: Utc::now(),
        };
        let result = self
            .entries
            .entry(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(existing) if existing.value().generation > generation => Op::Nop,
                    _ => Op::Put(entry),
                };
                std::future::ready(op)
            })
            .await;

        if matches!(result, CompResult::Unchanged(_)) {
            debug!(
                "Kept newer query result: {} (discarded generation {})",
                label, generation
            );
            return false;
        }
        debug!("Caching query result: {} (generation {})", label, generation);
        self.stats.write().writes += 1;
        true
    }

    /// Mark every entry whose key starts with `root` as stale
    ///
    /// Returns the root's new generation.
    pub fn invalidate_prefix(&self, root: &str) -> u64 {
        let generation = {
            let mut entry = self.generations.entry(root.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        self.stats.write().invalidations += 1;
        info!("Invalidated queries under root '{}' (generation {})", root, generation);
        generation
    }

    /// Whether `key` holds an entry written before the latest invalidation
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .get(key)
            .await
            .is_some_and(|entry| entry.generation < self.generation(key.root()))
    }

    /// Whether `key` holds any entry, fresh or stale
    #[must_use]
    pub fn contains_key(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries currently held, fresh or stale
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Get cache statistics
    #[must_use]
    pub fn get_stats(&self) -> QueryCacheStats {
        let mut stats = self.stats.read().clone();
        stats.calculate_hit_rate();
        stats
    }

    /// Reset statistics counters
    pub fn reset_stats(&self) {
        *self.stats.write() = QueryCacheStats::default();
    }

    fn record_hit(&self) {
        self.stats.write().hits += 1;
    }

    fn record_miss(&self, stale: bool) {
        let mut stats = self.stats.write();
        stats.misses += 1;
        if stale {
            stats.stale_reads += 1;
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new_default()
    }
}
