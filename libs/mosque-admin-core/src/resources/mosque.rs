//! Mosque details

use super::has_id;
use crate::api::SharedApiClient;
use crate::models::{MosqueOut, MosqueUpdate};
use crate::mutation::{MutationCallbacks, MutationSpec};
use crate::notify::SharedNotifier;
use crate::query::{fetch_required, FetchMessages, QuerySpec};
use std::sync::Arc;

pub const ROOT: &str = mosque_admin_common::MOSQUES_ROOT;

const DETAIL_MESSAGES: FetchMessages = FetchMessages {
    resource: "mosque",
    missing: "No mosque data returned. Please try again later.",
    failed: "Failed to fetch mosque. Please try again later.",
};

pub mod keys {
    use super::ROOT;
    use crate::query_key::{build_query_key_with_path, PathSegment, QueryKey};

    #[must_use]
    pub fn by_id(mosque_id: &str) -> QueryKey {
        build_query_key_with_path(ROOT, PathSegment::new("mosque_id", mosque_id), None)
    }
}

/// Input of the update mutation
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMosque {
    pub id: String,
    pub body: MosqueUpdate,
}

#[must_use]
pub fn mosque_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
    mosque_id: &str,
) -> QuerySpec<MosqueOut> {
    let key = keys::by_id(mosque_id);
    let enabled = has_id(mosque_id);
    let api = Arc::clone(api);
    let notifier = Arc::clone(notifier);
    let mosque_id = mosque_id.to_string();

    QuerySpec::new(key, move || {
        let api = Arc::clone(&api);
        let notifier = Arc::clone(&notifier);
        let mosque_id = mosque_id.clone();
        async move {
            fetch_required(notifier.as_ref(), DETAIL_MESSAGES, api.get_mosque(&mosque_id)).await
        }
    })
    .enabled(enabled)
}

#[must_use]
pub fn update_mosque_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<MosqueOut>,
) -> MutationSpec<UpdateMosque, MosqueOut> {
    let api = Arc::clone(api);
    MutationSpec::new("updating mosque", move |input: UpdateMosque| {
        let api = Arc::clone(&api);
        async move {
            api.update_mosque(&input.id, &input.body)
                .await
                .map(|response| response.data)
        }
    })
    .invalidates(ROOT)
    .success_message("Mosque updated successfully!")
    .error_message("Failed to update mosque")
    .with_callbacks(callbacks)
}
