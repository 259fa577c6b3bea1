//! Mosque Admin Core - server-state layer of the mosque administration client
//!
//! This library covers everything between the admin screens and the mosque
//! REST API: deterministic query keys, a shared injectable cache, read and
//! write descriptors with a uniform invalidation convention, and typed
//! transforms from raw form state to API payloads.
//!
//! # Features
//!
//! - **Query Keys**: `[root, {path}?, {params}?]` keys that compare by value
//! - **Shared Cache**: moka-backed cache with invalidation by resource root
//! - **Mutations**: notifications, callbacks and invalidation on every settle
//! - **Resources**: events, prayer configuration, iqama rules, prayer times,
//!   timetable uploads, calculation methods and mosque details
//! - **Forms**: raw input to payload, or a complete set of field errors
//!
//! # Quick Start
//!
//! ```no_run
//! use mosque_admin_core::resources::prayer_iqama;
//! use mosque_admin_core::{load_config, QueryClient, SharedApiClient, TracingNotifier};
//! use std::sync::Arc;
//!
//! # async fn example(api: SharedApiClient) -> mosque_admin_core::Result<()> {
//! let client = QueryClient::from_config(&load_config()?, Arc::new(TracingNotifier))?;
//! let notifier = client.shared_notifier();
//!
//! let mosque_id = client.selected_mosque_id(None);
//! let read = prayer_iqama::prayer_iqamas_query(&api, &notifier, mosque_id);
//! if let Some(rules) = client.fetch_query(&read).await?.into_data() {
//!     println!("{} iqama rules", rules.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: Enable test utilities (for testing only)

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod forms;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod observability;
pub mod query;
pub mod query_key;
pub mod resources;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::{ApiClient, ApiResponse, SharedApiClient};
pub use cache::{QueryCache, QueryCacheConfig, QueryCacheStats};
pub use client::QueryClient;
pub use config::{AdminConfig, MosqueSettings};
pub use config_loader::{load_config, load_config_from_env, load_config_with_paths, ConfigLoader};
pub use error::{AdminError, FieldErrors, Result};
pub use mutation::{Mutation, MutationCallbacks, MutationOutcome, MutationSpec, MutationState};
pub use notify::{Notifier, SharedNotifier, TracingNotifier};
pub use observability::{init_tracing, ObservabilityConfig};
pub use query::{fetch_required, FetchMessages, QueryOutcome, QuerySpec};
pub use query_key::{
    build_query_key, build_query_key_with_path, KeyToken, ParamValue, PathSegment, QueryKey,
    QueryParams, ToQueryParams,
};
