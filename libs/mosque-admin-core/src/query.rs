//! Declarative read descriptors
//!
//! A [`QuerySpec`] bundles the cache key, the fetch function and the
//! enablement guard for one read. Resource modules build them; the
//! [`QueryClient`](crate::QueryClient) runs them against the shared cache.

use crate::api::ApiResponse;
use crate::error::{AdminError, Result};
use crate::notify::Notifier;
use crate::query_key::QueryKey;
use futures_util::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

/// Boxed fetch function of a [`QuerySpec`]
pub type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Cache key, fetch function and enablement guard for a single read
pub struct QuerySpec<T> {
    pub key: QueryKey,
    pub fetch: FetchFn<T>,
    pub enabled: bool,
}

impl<T: 'static> QuerySpec<T> {
    /// Create an enabled query
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            key,
            fetch: Arc::new(move || fetch().boxed()),
            enabled: true,
        }
    }

    /// Set the enablement guard
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run the fetch function directly, bypassing the cache
    ///
    /// # Errors
    /// Returns whatever the fetch function returns
    pub async fn run(&self) -> Result<T> {
        (self.fetch)().await
    }
}

impl<T> Clone for QuerySpec<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetch: Arc::clone(&self.fetch),
            enabled: self.enabled,
        }
    }
}

impl<T> fmt::Debug for QuerySpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpec")
            .field("key", &self.key.to_string())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Result of running a [`QuerySpec`]
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    /// The query was disabled; nothing was fetched
    Disabled,
    /// Served from a fresh cache entry
    Cached(T),
    /// Fetched from the API and cached
    Fetched(T),
}

impl<T> QueryOutcome<T> {
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Disabled => None,
            Self::Cached(data) | Self::Fetched(data) => Some(data),
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Disabled => None,
            Self::Cached(data) | Self::Fetched(data) => Some(data),
        }
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }

    #[must_use]
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }
}

/// User-facing messages for a read
#[derive(Debug, Clone, Copy)]
pub struct FetchMessages {
    /// Resource name used in logs and in `AdminError::MissingData`
    pub resource: &'static str,
    /// Shown when the API returns no data envelope
    pub missing: &'static str,
    /// Shown when the call itself fails
    pub failed: &'static str,
}

/// Await an API call and require a data envelope
///
/// A missing envelope is a contract violation: it is logged, the user is
/// notified and `AdminError::MissingData` is returned. An empty collection
/// inside the envelope is a valid result.
///
/// # Errors
/// Returns the API error, or `AdminError::MissingData` when no data came back
pub async fn fetch_required<T, Fut>(
    notifier: &dyn Notifier,
    messages: FetchMessages,
    call: Fut,
) -> Result<T>
where
    Fut: Future<Output = Result<ApiResponse<T>>>,
{
    match call.await {
        Ok(ApiResponse { data: Some(data) }) => Ok(data),
        Ok(ApiResponse { data: None }) => {
            warn!("No {} data returned", messages.resource);
            notifier.error(messages.missing);
            Err(AdminError::missing_data(messages.resource))
        }
        Err(e) => {
            error!("Error fetching {}: {}", messages.resource, e);
            notifier.error(messages.failed);
            Err(e)
        }
    }
}
