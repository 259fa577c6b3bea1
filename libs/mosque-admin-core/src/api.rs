//! Boundary to the external REST client
//!
//! The HTTP transport lives outside this crate. Implementations map transport
//! failures to [`AdminError::Transport`](crate::AdminError::Transport) and
//! error envelopes to [`AdminError::Api`](crate::AdminError::Api); a response
//! that succeeded but carried no data envelope comes back as
//! `ApiResponse { data: None }`.

use crate::error::Result;
use crate::models::{
    CalculationMethodOut, CreateEventQuery, DailyPrayerTimes, EventListQuery, EventOut,
    EventTranslationIn, EventTranslationQuery, MosqueOut, MosquePrayerTimesQuery, MosqueUpdate,
    Paginated, PrayerConfigQuery, PrayerConfigurationIn, PrayerConfigurationOut,
    PrayerConfigurationUpdate, PrayerIqamaIn, PrayerIqamaOut, PrayerTimeUploadOut,
    PrayerTimesQuery, PrayerTimesUploadQuery, UploadFile,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Successful response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self { data: Some(data) }
    }

    /// A success envelope without data
    #[must_use]
    pub fn empty() -> Self {
        Self { data: None }
    }
}

/// Typed operations of the mosque REST API
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn list_events(
        &self,
        mosque_id: &str,
        query: &EventListQuery,
    ) -> Result<ApiResponse<Paginated<EventOut>>>;

    async fn create_event(&self, query: &CreateEventQuery) -> Result<ApiResponse<EventOut>>;

    async fn create_event_translation(
        &self,
        event_id: &str,
        query: &EventTranslationQuery,
        body: &EventTranslationIn,
    ) -> Result<ApiResponse<EventOut>>;

    async fn list_prayer_configs(
        &self,
        query: &PrayerConfigQuery,
    ) -> Result<ApiResponse<Paginated<PrayerConfigurationOut>>>;

    async fn add_prayer_config(
        &self,
        mosque_id: &str,
        body: &PrayerConfigurationIn,
    ) -> Result<ApiResponse<PrayerConfigurationOut>>;

    async fn update_prayer_config(
        &self,
        prayer_config_id: &str,
        body: &PrayerConfigurationUpdate,
    ) -> Result<ApiResponse<PrayerConfigurationOut>>;

    async fn list_prayer_iqamas(&self, mosque_id: &str)
        -> Result<ApiResponse<Vec<PrayerIqamaOut>>>;

    async fn create_prayer_iqama(&self, body: &PrayerIqamaIn)
        -> Result<ApiResponse<PrayerIqamaOut>>;

    async fn update_prayer_iqama(
        &self,
        prayer_iqama_id: &str,
        body: &PrayerIqamaIn,
    ) -> Result<ApiResponse<PrayerIqamaOut>>;

    async fn get_prayer_times(
        &self,
        query: &PrayerTimesQuery,
    ) -> Result<ApiResponse<Vec<DailyPrayerTimes>>>;

    async fn get_prayer_times_for_mosque(
        &self,
        mosque_id: &str,
        query: &MosquePrayerTimesQuery,
    ) -> Result<ApiResponse<Vec<DailyPrayerTimes>>>;

    async fn upload_prayer_times(
        &self,
        query: &PrayerTimesUploadQuery,
        file: &UploadFile,
    ) -> Result<ApiResponse<PrayerTimeUploadOut>>;

    async fn get_calculation_methods(&self) -> Result<ApiResponse<Vec<CalculationMethodOut>>>;

    async fn get_mosque(&self, mosque_id: &str) -> Result<ApiResponse<MosqueOut>>;

    async fn update_mosque(
        &self,
        mosque_id: &str,
        body: &MosqueUpdate,
    ) -> Result<ApiResponse<MosqueOut>>;
}

/// Shared handle to an API client
pub type SharedApiClient = Arc<dyn ApiClient>;
