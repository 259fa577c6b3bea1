//! Catalogue of prayer calculation methods

use crate::api::SharedApiClient;
use crate::models::CalculationMethodOut;
use crate::notify::SharedNotifier;
use crate::query::{fetch_required, FetchMessages, QuerySpec};
use std::sync::Arc;

pub const ROOT: &str = mosque_admin_common::CALCULATION_METHODS_ROOT;

const LIST_MESSAGES: FetchMessages = FetchMessages {
    resource: "calculation methods",
    missing: "No calculation methods data returned. Please try again later.",
    failed: "Failed to fetch calculation methods. Please try again later.",
};

pub mod keys {
    use super::ROOT;
    use crate::query_key::{build_query_key, QueryKey};

    #[must_use]
    pub fn all() -> QueryKey {
        build_query_key(ROOT, None)
    }
}

#[must_use]
pub fn calculation_methods_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
) -> QuerySpec<Vec<CalculationMethodOut>> {
    let api = Arc::clone(api);
    let notifier = Arc::clone(notifier);

    QuerySpec::new(keys::all(), move || {
        let api = Arc::clone(&api);
        let notifier = Arc::clone(&notifier);
        async move {
            fetch_required(notifier.as_ref(), LIST_MESSAGES, api.get_calculation_methods()).await
        }
    })
}
