//! Query client: runs read and write descriptors against the shared cache

use crate::cache::QueryCache;
use crate::config::{AdminConfig, MosqueSettings};
use crate::error::Result;
use crate::mutation::{Mutation, MutationSpec};
use crate::notify::{Notifier, SharedNotifier, TracingNotifier};
use crate::query::{QueryOutcome, QuerySpec};
use mosque_admin_common::{truncate_string, MAX_LOGGED_ERROR_LENGTH};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Orchestrator owning the injected cache and notifier
///
/// Cloning is cheap; clones share the same cache and notifier.
#[derive(Clone)]
pub struct QueryClient {
    cache: QueryCache,
    notifier: SharedNotifier,
    mosque: MosqueSettings,
}

impl QueryClient {
    #[must_use]
    pub fn new(cache: QueryCache, notifier: SharedNotifier) -> Self {
        Self {
            cache,
            notifier,
            mosque: MosqueSettings::default(),
        }
    }

    /// Client built from loaded configuration
    ///
    /// The cache is sized from `config.cache` and the mosque settings
    /// provide the fallback for [`selected_mosque_id`](Self::selected_mosque_id).
    ///
    /// # Errors
    /// Returns a configuration error if `config` does not validate
    pub fn from_config(config: &AdminConfig, notifier: SharedNotifier) -> Result<Self> {
        config.validate()?;
        info!(
            mosque = config.mosque.mosque_name.as_deref().unwrap_or("unnamed"),
            max_capacity = config.cache.max_capacity,
            ttl_secs = config.cache.ttl_secs,
            "Query client configured"
        );
        Ok(Self {
            cache: QueryCache::new(config.cache.clone()),
            notifier,
            mosque: config.mosque.clone(),
        })
    }

    /// Client with a default cache that reports notifications through tracing
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(QueryCache::new_default(), Arc::new(TracingNotifier))
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    #[must_use]
    pub fn mosque_settings(&self) -> &MosqueSettings {
        &self.mosque
    }

    /// Mosque that reads should be scoped to
    ///
    /// A non-blank `requested` id wins, otherwise the configured default.
    /// Returns an empty string when neither is set, which leaves
    /// mosque-scoped reads disabled.
    #[must_use]
    pub fn selected_mosque_id<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|id| !id.trim().is_empty())
            .or(self.mosque.default_mosque_id.as_deref())
            .unwrap_or_default()
    }

    /// Shared handle to the notifier, for resource factories
    #[must_use]
    pub fn shared_notifier(&self) -> SharedNotifier {
        Arc::clone(&self.notifier)
    }

    /// Run a read
    ///
    /// Disabled specs do nothing. A fresh cache entry is returned as is;
    /// otherwise the fetch runs and its result is cached under the
    /// generation that was current when the fetch started.
    ///
    /// # Errors
    /// Returns the fetch error; nothing is cached in that case
    #[instrument(skip(self, spec), fields(key = %spec.key))]
    pub async fn fetch_query<T>(&self, spec: &QuerySpec<T>) -> Result<QueryOutcome<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        if !spec.enabled {
            debug!("Query disabled: {}", spec.key);
            return Ok(QueryOutcome::Disabled);
        }

        if let Some(data) = self.cache.get::<T>(&spec.key).await {
            return Ok(QueryOutcome::Cached(data));
        }

        let generation = self.cache.generation(spec.key.root());
        match (spec.fetch)().await {
            Ok(data) => {
                self.cache
                    .set_at_generation(spec.key.clone(), data.clone(), generation)
                    .await;
                Ok(QueryOutcome::Fetched(data))
            }
            Err(e) => {
                error!(
                    "Query {} failed: {}",
                    spec.key,
                    truncate_string(&e.to_string(), MAX_LOGGED_ERROR_LENGTH)
                );
                Err(e)
            }
        }
    }

    /// Bind a write descriptor to this client
    #[must_use]
    pub fn mutation<I, O>(&self, spec: MutationSpec<I, O>) -> Mutation<I, O>
    where
        I: Send + 'static,
        O: Send + Sync + 'static,
    {
        Mutation::new(self.clone(), spec)
    }

    /// Invalidate every cached query under `root`
    pub fn invalidate(&self, root: &str) -> u64 {
        self.cache.invalidate_prefix(root)
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCacheConfig;
    use crate::error::AdminError;
    use crate::query_key::{build_query_key, QueryParams};
    use crate::test_utils::{RecordingNotifier, TEST_MOSQUE_ID};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_spec(counter: Arc<AtomicUsize>) -> QuerySpec<Vec<u32>> {
        let key = build_query_key("events", Some(QueryParams::new().with("year", 2024)));
        QuerySpec::new(key, move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![u32::try_from(n).unwrap_or_default()])
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_then_cache_hit() {
        let client = QueryClient::with_defaults();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec(calls.clone());

        let first = client.fetch_query(&spec).await.unwrap();
        let second = client.fetch_query(&spec).await.unwrap();

        assert_eq!(first, QueryOutcome::Fetched(vec![0]));
        assert_eq!(second, QueryOutcome::Cached(vec![0]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_query_does_not_fetch() {
        let client = QueryClient::with_defaults();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec(calls.clone()).enabled(false);

        assert_eq!(client.fetch_query(&spec).await.unwrap(), QueryOutcome::Disabled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let client = QueryClient::with_defaults();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec(calls.clone());

        client.fetch_query(&spec).await.unwrap();
        client.invalidate("events");
        let refetched = client.fetch_query(&spec).await.unwrap();

        assert_eq!(refetched, QueryOutcome::Fetched(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let client = QueryClient::with_defaults();
        let key = build_query_key("events", None);
        let spec: QuerySpec<u32> =
            QuerySpec::new(key.clone(), || async { Err(AdminError::transport("offline")) });

        assert!(client.fetch_query(&spec).await.is_err());
        assert!(!client.cache().contains_key(&key));
    }

    #[tokio::test]
    async fn test_from_config_sizes_the_cache() {
        let mut config = AdminConfig::default();
        config.cache = QueryCacheConfig {
            max_capacity: 5,
            ttl_secs: 60,
            tti_secs: 30,
        };
        let client = QueryClient::from_config(&config, Arc::new(RecordingNotifier::new())).unwrap();

        assert_eq!(client.cache().config(), &config.cache);
        let spec = counting_spec(Arc::new(AtomicUsize::new(0)));
        assert!(client.fetch_query(&spec).await.unwrap().is_fetched());
        assert!(client.fetch_query(&spec).await.unwrap().is_cached());
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = AdminConfig::default();
        config.cache.ttl_secs = u64::MAX;
        let result = QueryClient::from_config(&config, Arc::new(RecordingNotifier::new()));
        assert!(matches!(result, Err(AdminError::Configuration { .. })));
    }

    #[test]
    fn test_selected_mosque_falls_back_to_configured_default() {
        let mut config = AdminConfig::default();
        config.mosque.default_mosque_id = Some(TEST_MOSQUE_ID.to_string());
        let client = QueryClient::from_config(&config, Arc::new(RecordingNotifier::new())).unwrap();

        assert_eq!(client.selected_mosque_id(None), TEST_MOSQUE_ID);
        assert_eq!(client.selected_mosque_id(Some(" ")), TEST_MOSQUE_ID);
        assert_eq!(client.selected_mosque_id(Some("other")), "other");
        assert_eq!(client.mosque_settings(), &config.mosque);

        assert_eq!(QueryClient::with_defaults().selected_mosque_id(None), "");
    }
}
