//! Prayer calculation settings of a mosque

use crate::api::SharedApiClient;
use crate::models::{
    Paginated, PrayerConfigQuery, PrayerConfigurationIn, PrayerConfigurationOut,
    PrayerConfigurationUpdate,
};
use crate::mutation::{MutationCallbacks, MutationSpec};
use crate::notify::SharedNotifier;
use crate::query::{fetch_required, FetchMessages, QuerySpec};
use crate::query_key::{QueryParams, ToQueryParams};
use std::sync::Arc;

pub const ROOT: &str = mosque_admin_common::PRAYER_CONFIG_ROOT;

const LIST_MESSAGES: FetchMessages = FetchMessages {
    resource: "prayer configs",
    missing: "No prayer configs data returned. Please try again later.",
    failed: "Failed to fetch prayer configs. Please try again later.",
};

impl ToQueryParams for PrayerConfigQuery {
    fn to_query_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("mosque_id", self.mosque_id.clone())
            .with_opt("page", self.page)
            .with_opt("size", self.size)
    }
}

pub mod keys {
    use super::ROOT;
    use crate::models::PrayerConfigQuery;
    use crate::query_key::{
        build_query_key, build_query_key_with_path, PathSegment, QueryKey, ToQueryParams,
    };

    #[must_use]
    pub fn all(query: &PrayerConfigQuery) -> QueryKey {
        build_query_key(ROOT, Some(query.to_query_params()))
    }

    #[must_use]
    pub fn by_id(prayer_config_id: &str) -> QueryKey {
        build_query_key_with_path(
            ROOT,
            PathSegment::new("prayer_config_id", prayer_config_id),
            None,
        )
    }
}

/// Input of the create mutation
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePrayerConfig {
    pub mosque_id: String,
    pub body: PrayerConfigurationIn,
}

/// Input of the update mutation
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePrayerConfig {
    pub id: String,
    pub body: PrayerConfigurationUpdate,
}

/// List prayer configurations, optionally filtered by mosque
#[must_use]
pub fn prayer_configs_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
    query: PrayerConfigQuery,
) -> QuerySpec<Paginated<PrayerConfigurationOut>> {
    let key = keys::all(&query);
    let api = Arc::clone(api);
    let notifier = Arc::clone(notifier);

    QuerySpec::new(key, move || {
        let api = Arc::clone(&api);
        let notifier = Arc::clone(&notifier);
        let query = query.clone();
        async move {
            fetch_required(
                notifier.as_ref(),
                LIST_MESSAGES,
                api.list_prayer_configs(&query),
            )
            .await
        }
    })
}

#[must_use]
pub fn create_prayer_config_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<PrayerConfigurationOut>,
) -> MutationSpec<CreatePrayerConfig, PrayerConfigurationOut> {
    let api = Arc::clone(api);
    MutationSpec::new(
        "creating prayer configuration",
        move |input: CreatePrayerConfig| {
            let api = Arc::clone(&api);
            async move {
                api.add_prayer_config(&input.mosque_id, &input.body)
                    .await
                    .map(|response| response.data)
            }
        },
    )
    .invalidates(ROOT)
    .success_message("Prayer configuration created successfully!")
    .error_message("Failed to create prayer configuration")
    .with_callbacks(callbacks)
}

#[must_use]
pub fn update_prayer_config_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<PrayerConfigurationOut>,
) -> MutationSpec<UpdatePrayerConfig, PrayerConfigurationOut> {
    let api = Arc::clone(api);
    MutationSpec::new(
        "updating prayer configuration",
        move |input: UpdatePrayerConfig| {
            let api = Arc::clone(&api);
            async move {
                api.update_prayer_config(&input.id, &input.body)
                    .await
                    .map(|response| response.data)
            }
        },
    )
    .invalidates(ROOT)
    .success_message("Prayer configuration updated successfully!")
    .error_message("Failed to update prayer configuration")
    .with_callbacks(callbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::client::QueryClient;
    use crate::test_utils::{
        create_test_prayer_config, create_test_prayer_configs, ops, MockApiClient, MockResponse,
        RecordingNotifier, TEST_MOSQUE_ID,
    };
    use serde_json::json;

    #[test]
    fn test_key_shapes() {
        let query = PrayerConfigQuery {
            mosque_id: Some(TEST_MOSQUE_ID.to_string()),
            ..PrayerConfigQuery::default()
        };
        assert_eq!(
            keys::all(&query).to_json(),
            json!(["prayer-config", {"mosque_id": TEST_MOSQUE_ID}])
        );
        assert_eq!(
            keys::by_id("pc-1").to_json(),
            json!(["prayer-config", {"prayer_config_id": "pc-1"}])
        );
    }

    #[tokio::test]
    async fn test_list_query_returns_page() {
        let mock = MockApiClient::new().with_response(
            ops::LIST_PRAYER_CONFIGS,
            MockResponse::data(&create_test_prayer_configs(2)),
        );
        let api: SharedApiClient = Arc::new(mock);
        let notifier: SharedNotifier = Arc::new(RecordingNotifier::new());

        let page = prayer_configs_query(&api, &notifier, PrayerConfigQuery::default())
            .run()
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_update_sends_id_and_body() {
        let mock = Arc::new(MockApiClient::new().with_response(
            ops::UPDATE_PRAYER_CONFIG,
            MockResponse::data(&create_test_prayer_config("pc-9")),
        ));
        let api: SharedApiClient = mock.clone();
        let notifier = Arc::new(RecordingNotifier::new());
        let client = QueryClient::new(QueryCache::new_default(), notifier.clone());
        let spec = update_prayer_config_mutation(&api, MutationCallbacks::new());
        assert_eq!(spec.invalidates, vec![ROOT]);

        let updated = client
            .mutation(spec)
            .mutate(UpdatePrayerConfig {
                id: "pc-9".to_string(),
                body: PrayerConfigurationUpdate {
                    calculation_method: Some(3),
                    ..PrayerConfigurationUpdate::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.map(|c| c.id), Some("pc-9".to_string()));
        let call = mock.last_call(ops::UPDATE_PRAYER_CONFIG).unwrap();
        assert_eq!(call.path.as_deref(), Some("pc-9"));
        assert_eq!(call.payload["calculation_method"], json!(3));
        assert_eq!(
            notifier.successes(),
            vec!["Prayer configuration updated successfully!".to_string()]
        );
    }
}
