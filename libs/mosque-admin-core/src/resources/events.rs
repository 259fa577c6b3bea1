//! Mosque events

use super::has_id;
use crate::api::SharedApiClient;
use crate::models::{
    CreateEventQuery, EventListQuery, EventOut, EventTranslationIn, EventTranslationQuery,
    Paginated,
};
use crate::mutation::{MutationCallbacks, MutationSpec};
use crate::notify::SharedNotifier;
use crate::query::{fetch_required, FetchMessages, QuerySpec};
use crate::query_key::{QueryParams, ToQueryParams};
use std::sync::Arc;

pub const ROOT: &str = mosque_admin_common::EVENTS_ROOT;

const LIST_MESSAGES: FetchMessages = FetchMessages {
    resource: "events",
    missing: "No events data returned. Please try again later.",
    failed: "Failed to fetch events. Please try again later.",
};

impl ToQueryParams for EventListQuery {
    fn to_query_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("lang", self.lang.clone())
            .with_opt("upcoming", self.upcoming)
            .with_opt("page", self.page)
            .with_opt("size", self.size)
    }
}

pub mod keys {
    use super::ROOT;
    use crate::models::EventListQuery;
    use crate::query_key::{
        build_query_key, build_query_key_with_path, PathSegment, QueryKey, ToQueryParams,
    };

    #[must_use]
    pub fn all(query: &EventListQuery) -> QueryKey {
        build_query_key(ROOT, Some(query.to_query_params()))
    }

    /// Events of one mosque: `["events", {mosque_id}, query]`
    #[must_use]
    pub fn by_mosque(mosque_id: &str, query: &EventListQuery) -> QueryKey {
        build_query_key_with_path(
            ROOT,
            PathSegment::new("mosque_id", mosque_id),
            Some(query.to_query_params()),
        )
    }
}

/// Input of the event translation mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventTranslation {
    pub event_id: String,
    pub query: EventTranslationQuery,
    pub body: EventTranslationIn,
}

/// List a mosque's events; disabled until a mosque is selected
#[must_use]
pub fn events_for_mosque_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
    mosque_id: &str,
    query: EventListQuery,
) -> QuerySpec<Paginated<EventOut>> {
    let key = keys::by_mosque(mosque_id, &query);
    let enabled = has_id(mosque_id);
    let api = Arc::clone(api);
    let notifier = Arc::clone(notifier);
    let mosque_id = mosque_id.to_string();

    QuerySpec::new(key, move || {
        let api = Arc::clone(&api);
        let notifier = Arc::clone(&notifier);
        let mosque_id = mosque_id.clone();
        let query = query.clone();
        async move {
            fetch_required(
                notifier.as_ref(),
                LIST_MESSAGES,
                api.list_events(&mosque_id, &query),
            )
            .await
        }
    })
    .enabled(enabled)
}

#[must_use]
pub fn create_event_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<EventOut>,
) -> MutationSpec<CreateEventQuery, EventOut> {
    let api = Arc::clone(api);
    MutationSpec::new("creating event", move |query: CreateEventQuery| {
        let api = Arc::clone(&api);
        async move { api.create_event(&query).await.map(|response| response.data) }
    })
    .invalidates(ROOT)
    .success_message("Event created successfully!")
    .error_message("Failed to create event")
    .with_callbacks(callbacks)
}

#[must_use]
pub fn create_event_translation_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<EventOut>,
) -> MutationSpec<CreateEventTranslation, EventOut> {
    let api = Arc::clone(api);
    MutationSpec::new(
        "creating event translation",
        move |input: CreateEventTranslation| {
            let api = Arc::clone(&api);
            async move {
                api.create_event_translation(&input.event_id, &input.query, &input.body)
                    .await
                    .map(|response| response.data)
            }
        },
    )
    .invalidates(ROOT)
    .success_message("Event translation created successfully!")
    .error_message("Failed to create event translation")
    .with_callbacks(callbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::client::QueryClient;
    use crate::query_key::QueryKey;
    use crate::test_utils::{
        create_test_event, ops, MockApiClient, MockResponse, RecordingNotifier, TEST_MOSQUE_ID,
    };
    use serde_json::json;

    async fn client_with_cached_events(
        mock: MockApiClient,
    ) -> (Arc<MockApiClient>, QueryClient, Arc<RecordingNotifier>, QueryKey) {
        let mock = Arc::new(mock);
        let notifier = Arc::new(RecordingNotifier::new());
        let client = QueryClient::new(QueryCache::new_default(), notifier.clone());
        let key = keys::by_mosque(TEST_MOSQUE_ID, &EventListQuery::default());
        client
            .cache()
            .set(key.clone(), Paginated::single_page(vec![create_test_event("e-1")]))
            .await;
        (mock, client, notifier, key)
    }

    #[test]
    fn test_by_mosque_key_shape() {
        let query = EventListQuery {
            lang: Some("ar".to_string()),
            ..EventListQuery::default()
        };
        assert_eq!(
            keys::by_mosque("m-1", &query).to_json(),
            json!(["events", {"mosque_id": "m-1"}, {"lang": "ar"}])
        );
    }

    #[test]
    fn test_empty_query_key_has_root_only() {
        assert_eq!(keys::all(&EventListQuery::default()).to_json(), json!(["events"]));
    }

    #[tokio::test]
    async fn test_create_event_sends_query_and_invalidates_events() {
        let (mock, client, notifier, cached) = client_with_cached_events(
            MockApiClient::new()
                .with_response(ops::CREATE_EVENT, MockResponse::data(&create_test_event("e-2"))),
        )
        .await;
        let api: SharedApiClient = mock.clone();
        let spec = create_event_mutation(&api, MutationCallbacks::new());
        assert_eq!(spec.invalidates, vec![ROOT]);

        let created = client
            .mutation(spec)
            .mutate(CreateEventQuery {
                mosque_id: TEST_MOSQUE_ID.to_string(),
                title: "Eid prayer".to_string(),
                description: None,
                start_time: create_test_event("e-2").start_time,
                end_time: None,
                lang: Some("en".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.map(|e| e.id), Some("e-2".to_string()));
        let call = mock.last_call(ops::CREATE_EVENT).unwrap();
        assert_eq!(call.path, None);
        assert_eq!(call.payload["mosque_id"], json!(TEST_MOSQUE_ID));
        assert_eq!(call.payload["title"], json!("Eid prayer"));
        assert!(client.cache().is_stale(&cached).await);
        assert_eq!(notifier.successes(), vec!["Event created successfully!".to_string()]);
    }

    #[tokio::test]
    async fn test_create_translation_targets_event_and_invalidates_events() {
        let (mock, client, notifier, cached) = client_with_cached_events(
            MockApiClient::new().with_response(
                ops::CREATE_EVENT_TRANSLATION,
                MockResponse::data(&create_test_event("e-1")),
            ),
        )
        .await;
        let api: SharedApiClient = mock.clone();
        let spec = create_event_translation_mutation(&api, MutationCallbacks::new());
        assert_eq!(spec.invalidates, vec![ROOT]);

        client
            .mutation(spec)
            .mutate(CreateEventTranslation {
                event_id: "e-1".to_string(),
                query: EventTranslationQuery {
                    lang: "ar".to_string(),
                },
                body: EventTranslationIn {
                    title: "صلاة العيد".to_string(),
                    description: None,
                },
            })
            .await
            .unwrap();

        let call = mock.last_call(ops::CREATE_EVENT_TRANSLATION).unwrap();
        assert_eq!(call.path.as_deref(), Some("e-1"));
        assert_eq!(call.payload["query"], json!({"lang": "ar"}));
        assert_eq!(call.payload["body"]["title"], json!("صلاة العيد"));
        assert!(client.cache().is_stale(&cached).await);
        assert_eq!(
            notifier.successes(),
            vec!["Event translation created successfully!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_create_still_invalidates_events() {
        let (mock, client, notifier, cached) = client_with_cached_events(
            MockApiClient::new().with_response(ops::CREATE_EVENT, MockResponse::error(400, "bad")),
        )
        .await;
        let api: SharedApiClient = mock.clone();

        let result = client
            .mutation(create_event_mutation(&api, MutationCallbacks::new()))
            .mutate(CreateEventQuery {
                mosque_id: TEST_MOSQUE_ID.to_string(),
                title: String::new(),
                description: None,
                start_time: create_test_event("e-3").start_time,
                end_time: None,
                lang: None,
            })
            .await;

        assert!(result.is_err());
        assert!(client.cache().is_stale(&cached).await);
        assert_eq!(notifier.errors(), vec!["Failed to create event".to_string()]);
    }
}
