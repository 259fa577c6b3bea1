//! Iqama schedule of a mosque

use super::has_id;
use crate::api::SharedApiClient;
use crate::models::{PrayerIqamaIn, PrayerIqamaOut};
use crate::mutation::{MutationCallbacks, MutationSpec};
use crate::notify::SharedNotifier;
use crate::query::{fetch_required, FetchMessages, QuerySpec};
use std::sync::Arc;

pub const ROOT: &str = mosque_admin_common::PRAYER_IQAMA_ROOT;

const LIST_MESSAGES: FetchMessages = FetchMessages {
    resource: "prayer iqamas",
    missing: "No prayer iqama data returned. Please try again later.",
    failed: "Failed to fetch prayer iqamas. Please try again later.",
};

pub mod keys {
    use super::ROOT;
    use crate::query_key::{build_query_key_with_path, PathSegment, QueryKey};

    #[must_use]
    pub fn by_mosque(mosque_id: &str) -> QueryKey {
        build_query_key_with_path(ROOT, PathSegment::new("mosque_id", mosque_id), None)
    }
}

/// Input of the update mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrayerIqama {
    pub id: String,
    pub body: PrayerIqamaIn,
}

/// Iqama rules of one mosque; disabled until a mosque is selected
#[must_use]
pub fn prayer_iqamas_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
    mosque_id: &str,
) -> QuerySpec<Vec<PrayerIqamaOut>> {
    let key = keys::by_mosque(mosque_id);
    let enabled = has_id(mosque_id);
    let api = Arc::clone(api);
    let notifier = Arc::clone(notifier);
    let mosque_id = mosque_id.to_string();

    QuerySpec::new(key, move || {
        let api = Arc::clone(&api);
        let notifier = Arc::clone(&notifier);
        let mosque_id = mosque_id.clone();
        async move {
            fetch_required(
                notifier.as_ref(),
                LIST_MESSAGES,
                api.list_prayer_iqamas(&mosque_id),
            )
            .await
        }
    })
    .enabled(enabled)
}

#[must_use]
pub fn create_prayer_iqama_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<PrayerIqamaOut>,
) -> MutationSpec<PrayerIqamaIn, PrayerIqamaOut> {
    let api = Arc::clone(api);
    MutationSpec::new("creating prayer iqama", move |body: PrayerIqamaIn| {
        let api = Arc::clone(&api);
        async move {
            api.create_prayer_iqama(&body)
                .await
                .map(|response| response.data)
        }
    })
    .invalidates(ROOT)
    .success_message("Prayer Iqama created successfully!")
    .error_message("Failed to create prayer iqama")
    .with_callbacks(callbacks)
}

#[must_use]
pub fn update_prayer_iqama_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<PrayerIqamaOut>,
) -> MutationSpec<UpdatePrayerIqama, PrayerIqamaOut> {
    let api = Arc::clone(api);
    MutationSpec::new("updating prayer iqama", move |input: UpdatePrayerIqama| {
        let api = Arc::clone(&api);
        async move {
            api.update_prayer_iqama(&input.id, &input.body)
                .await
                .map(|response| response.data)
        }
    })
    .invalidates(ROOT)
    .success_message("Prayer Iqama updated successfully!")
    .error_message("Failed to update prayer iqama")
    .with_callbacks(callbacks)
}
