//! Computed and uploaded prayer timetables

use super::has_id;
use crate::api::SharedApiClient;
use crate::models::{DailyPrayerTimes, MosquePrayerTimesQuery, PrayerTimesQuery};
use crate::notify::SharedNotifier;
use crate::query::{fetch_required, FetchMessages, QuerySpec};
use crate::query_key::{QueryParams, ToQueryParams};
use std::sync::Arc;

pub const ROOT: &str = mosque_admin_common::PRAYER_TIMES_ROOT;

const TIMES_MESSAGES: FetchMessages = FetchMessages {
    resource: "prayer times",
    missing: "No prayer times data returned. Please try again later.",
    failed: "Failed to fetch prayer times. Please try again later.",
};

impl ToQueryParams for PrayerTimesQuery {
    fn to_query_params(&self) -> QueryParams {
        QueryParams::new()
            .with("year", self.year)
            .with_opt("month", self.month)
            .with_opt("day", self.day)
            .with_opt("latitude", self.latitude)
            .with_opt("longitude", self.longitude)
            .with_opt("timezone", self.timezone.clone())
            .with_opt("hijri", self.hijri)
            .with_opt("hijri_adjustment", self.hijri_adjustment)
            .with_opt("method", self.method)
    }
}

impl ToQueryParams for MosquePrayerTimesQuery {
    fn to_query_params(&self) -> QueryParams {
        QueryParams::new()
            .with("year", self.year)
            .with_opt("month", self.month)
            .with_opt("day", self.day)
            .with_opt("hijri", self.hijri)
            .with_opt("source", self.source.map(|s| s.as_str()))
    }
}

pub mod keys {
    use super::ROOT;
    use crate::models::{MosquePrayerTimesQuery, PrayerTimesQuery};
    use crate::query_key::{
        build_query_key, build_query_key_with_path, PathSegment, QueryKey, ToQueryParams,
    };

    #[must_use]
    pub fn all(query: &PrayerTimesQuery) -> QueryKey {
        build_query_key(ROOT, Some(query.to_query_params()))
    }

    /// A mosque's timetable: `["prayer-times", {mosque_id}, query]`
    #[must_use]
    pub fn for_mosque(mosque_id: &str, query: &MosquePrayerTimesQuery) -> QueryKey {
        build_query_key_with_path(
            ROOT,
            PathSegment::new("mosque_id", mosque_id),
            Some(query.to_query_params()),
        )
    }
}

/// Timetable computed for an arbitrary location
#[must_use]
pub fn prayer_times_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
    query: PrayerTimesQuery,
) -> QuerySpec<Vec<DailyPrayerTimes>> {
    let key = keys::all(&query);
    let api = Arc::clone(api);
    let notifier = Arc::clone(notifier);

    QuerySpec::new(key, move || {
        let api = Arc::clone(&api);
        let notifier = Arc::clone(&notifier);
        let query = query.clone();
        async move {
            fetch_required(notifier.as_ref(), TIMES_MESSAGES, api.get_prayer_times(&query)).await
        }
    })
}

/// A mosque's timetable; disabled until a mosque is selected
#[must_use]
pub fn prayer_times_for_mosque_query(
    api: &SharedApiClient,
    notifier: &SharedNotifier,
    mosque_id: &str,
    query: MosquePrayerTimesQuery,
) -> QuerySpec<Vec<DailyPrayerTimes>> {
    let key = keys::for_mosque(mosque_id, &query);
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
                TIMES_MESSAGES,
                api.get_prayer_times_for_mosque(&mosque_id, &query),
            )
            .await
        }
    })
    .enabled(enabled)
}
