//! Timetable upload
//!
//! An upload replaces a mosque's timetable for a year, so it invalidates the
//! `prayer-times` root rather than a root of its own.

use crate::api::SharedApiClient;
use crate::models::{PrayerTimeUploadOut, PrayerTimesUploadQuery, UploadFile};
use crate::mutation::{MutationCallbacks, MutationSpec};
use std::sync::Arc;

/// Validated upload request, built by `PrayerTimesUploadForm::into_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPrayerTimes {
    pub query: PrayerTimesUploadQuery,
    pub file: UploadFile,
}

#[must_use]
pub fn upload_prayer_times_mutation(
    api: &SharedApiClient,
    callbacks: MutationCallbacks<PrayerTimeUploadOut>,
) -> MutationSpec<UploadPrayerTimes, PrayerTimeUploadOut> {
    let api = Arc::clone(api);
    MutationSpec::new("uploading prayer times", move |request: UploadPrayerTimes| {
        let api = Arc::clone(&api);
        async move {
            api.upload_prayer_times(&request.query, &request.file)
                .await
                .map(|response| response.data)
        }
    })
    .invalidates(super::prayer_times::ROOT)
    .success_message("Prayer times uploaded successfully!")
    .error_message("Failed to upload prayer times")
    .with_callbacks(callbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::client::QueryClient;
    use crate::forms::PrayerTimesUploadForm;
    use crate::test_utils::{ops, MockApiClient, MockResponse, RecordingNotifier, TEST_MOSQUE_ID};
    use serde_json::json;

    #[tokio::test]
    async fn test_upload_sends_query_and_file() {
        let mock = Arc::new(MockApiClient::new().with_response(
            ops::UPLOAD_PRAYER_TIMES,
            MockResponse::data(&PrayerTimeUploadOut {
                id: "up-1".to_string(),
                mosque_id: TEST_MOSQUE_ID.to_string(),
                year: 2024,
                rows_imported: 366,
            }),
        ));
        let api: SharedApiClient = mock.clone();
        let client = QueryClient::new(QueryCache::new_default(), Arc::new(RecordingNotifier::new()));

        let request = PrayerTimesUploadForm::new(TEST_MOSQUE_ID, 2024)
            .with_file(UploadFile::new("2024.csv", Some("text/csv"), b"date,fajr\n".to_vec()))
            .into_request()
            .unwrap();
        let out = client
            .mutation(upload_prayer_times_mutation(&api, MutationCallbacks::new()))
            .mutate(request)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(out.rows_imported, 366);
        let call = mock.last_call(ops::UPLOAD_PRAYER_TIMES).unwrap();
        assert_eq!(call.payload["query"]["file_type"], json!("csv"));
        assert_eq!(call.payload["file_name"], json!("2024.csv"));
    }

    #[test]
    fn test_upload_invalidates_prayer_times() {
        let api: SharedApiClient = Arc::new(MockApiClient::new());
        let spec = upload_prayer_times_mutation(&api, MutationCallbacks::new());
        assert_eq!(spec.invalidates, vec!["prayer-times"]);
    }
}
