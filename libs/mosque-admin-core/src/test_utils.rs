//! Test utilities: a scripted API client, a recording notifier and fixtures

use crate::api::{ApiClient, ApiResponse};
use crate::error::{AdminError, Result};
use crate::models::{
    CalculationMethodOut, CreateEventQuery, DailyPrayerTimes, EventListQuery, EventOut,
    EventTranslationIn, EventTranslationQuery, IqamaMode, MosqueOut, MosquePrayerTimesQuery,
    MosqueUpdate, Paginated, PrayerConfigQuery, PrayerConfigurationIn, PrayerConfigurationOut,
    PrayerConfigurationUpdate, PrayerIqamaIn, PrayerIqamaOut, PrayerName, PrayerTimeUploadOut,
    PrayerTimesQuery, PrayerTimesUploadQuery, PrayerTune, School, UploadFile,
};
use crate::notify::Notifier;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};

/// Operation names understood by [`MockApiClient`]
pub mod ops {
    pub const LIST_EVENTS: &str = "list_events";
    pub const CREATE_EVENT: &str = "create_event";
    pub const CREATE_EVENT_TRANSLATION: &str = "create_event_translation";
    pub const LIST_PRAYER_CONFIGS: &str = "list_prayer_configs";
    pub const ADD_PRAYER_CONFIG: &str = "add_prayer_config";
    pub const UPDATE_PRAYER_CONFIG: &str = "update_prayer_config";
    pub const LIST_PRAYER_IQAMAS: &str = "list_prayer_iqamas";
    pub const CREATE_PRAYER_IQAMA: &str = "create_prayer_iqama";
    pub const UPDATE_PRAYER_IQAMA: &str = "update_prayer_iqama";
    pub const GET_PRAYER_TIMES: &str = "get_prayer_times";
    pub const GET_PRAYER_TIMES_FOR_MOSQUE: &str = "get_prayer_times_for_mosque";
    pub const UPLOAD_PRAYER_TIMES: &str = "upload_prayer_times";
    pub const GET_CALCULATION_METHODS: &str = "get_calculation_methods";
    pub const GET_MOSQUE: &str = "get_mosque";
    pub const UPDATE_MOSQUE: &str = "update_mosque";
}

/// A notification captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Notifier that keeps every notification in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Success(m) => Some(m.clone()),
                Notification::Error(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Error(m) => Some(m.clone()),
                Notification::Success(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .push(Notification::Error(message.to_string()));
    }
}

/// A scripted response for one API call
#[derive(Debug, Clone)]
pub enum MockResponse {
    Data(Value),
    /// Success envelope without data
    Empty,
    Error { status: u16, message: String },
}

impl MockResponse {
    pub fn data<T: Serialize>(value: &T) -> Self {
        Self::Data(serde_json::to_value(value).unwrap_or(Value::Null))
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::Error {
            status,
            message: message.into(),
        }
    }
}

/// One call received by [`MockApiClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub path: Option<String>,
    pub payload: Value,
}

/// API client that replays scripted responses and records every call
///
/// Responses are queued per operation. The last queued response for an
/// operation is replayed for every further call.
#[derive(Debug, Default)]
pub struct MockApiClient {
    responses: Mutex<HashMap<&'static str, VecDeque<MockResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockApiClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `operation`
    pub fn respond(&self, operation: &'static str, response: MockResponse) {
        self.responses
            .lock()
            .entry(operation)
            .or_default()
            .push_back(response);
    }

    /// Builder form of [`respond`](Self::respond)
    #[must_use]
    pub fn with_response(self, operation: &'static str, response: MockResponse) -> Self {
        self.respond(operation, response);
        self
    }

    /// Number of calls made to `operation`
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Most recent call to `operation`
    #[must_use]
    pub fn last_call(&self, operation: &str) -> Option<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|c| c.operation == operation)
            .cloned()
    }

    fn reply<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: Option<&str>,
        payload: Value,
    ) -> Result<ApiResponse<T>> {
        self.calls.lock().push(RecordedCall {
            operation,
            path: path.map(str::to_string),
            payload,
        });

        let response = {
            let mut responses = self.responses.lock();
            let queue = responses.get_mut(operation);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match response {
            Some(MockResponse::Data(value)) => Ok(ApiResponse::new(serde_json::from_value(value)?)),
            Some(MockResponse::Empty) => Ok(ApiResponse::empty()),
            Some(MockResponse::Error { status, message }) => Err(AdminError::api(status, message)),
            None => Err(AdminError::unknown(format!(
                "no response scripted for {operation}"
            ))),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn list_events(
        &self,
        mosque_id: &str,
        query: &EventListQuery,
    ) -> Result<ApiResponse<Paginated<EventOut>>> {
        self.reply(ops::LIST_EVENTS, Some(mosque_id), to_json(query))
    }

    async fn create_event(&self, query: &CreateEventQuery) -> Result<ApiResponse<EventOut>> {
        self.reply(ops::CREATE_EVENT, None, to_json(query))
    }

    async fn create_event_translation(
        &self,
        event_id: &str,
        query: &EventTranslationQuery,
        body: &EventTranslationIn,
    ) -> Result<ApiResponse<EventOut>> {
        self.reply(
            ops::CREATE_EVENT_TRANSLATION,
            Some(event_id),
            json!({ "query": query, "body": body }),
        )
    }

    async fn list_prayer_configs(
        &self,
        query: &PrayerConfigQuery,
    ) -> Result<ApiResponse<Paginated<PrayerConfigurationOut>>> {
        self.reply(ops::LIST_PRAYER_CONFIGS, None, to_json(query))
    }

    async fn add_prayer_config(
        &self,
        mosque_id: &str,
        body: &PrayerConfigurationIn,
    ) -> Result<ApiResponse<PrayerConfigurationOut>> {
        self.reply(ops::ADD_PRAYER_CONFIG, Some(mosque_id), to_json(body))
    }

    async fn update_prayer_config(
        &self,
        prayer_config_id: &str,
        body: &PrayerConfigurationUpdate,
    ) -> Result<ApiResponse<PrayerConfigurationOut>> {
        self.reply(ops::UPDATE_PRAYER_CONFIG, Some(prayer_config_id), to_json(body))
    }

    async fn list_prayer_iqamas(
        &self,
        mosque_id: &str,
    ) -> Result<ApiResponse<Vec<PrayerIqamaOut>>> {
        self.reply(ops::LIST_PRAYER_IQAMAS, Some(mosque_id), Value::Null)
    }

    async fn create_prayer_iqama(
        &self,
        body: &PrayerIqamaIn,
    ) -> Result<ApiResponse<PrayerIqamaOut>> {
        self.reply(ops::CREATE_PRAYER_IQAMA, None, to_json(body))
    }

    async fn update_prayer_iqama(
        &self,
        prayer_iqama_id: &str,
        body: &PrayerIqamaIn,
    ) -> Result<ApiResponse<PrayerIqamaOut>> {
        self.reply(ops::UPDATE_PRAYER_IQAMA, Some(prayer_iqama_id), to_json(body))
    }

    async fn get_prayer_times(
        &self,
        query: &PrayerTimesQuery,
    ) -> Result<ApiResponse<Vec<DailyPrayerTimes>>> {
        self.reply(ops::GET_PRAYER_TIMES, None, to_json(query))
    }

    async fn get_prayer_times_for_mosque(
        &self,
        mosque_id: &str,
        query: &MosquePrayerTimesQuery,
    ) -> Result<ApiResponse<Vec<DailyPrayerTimes>>> {
        self.reply(ops::GET_PRAYER_TIMES_FOR_MOSQUE, Some(mosque_id), to_json(query))
    }

    async fn upload_prayer_times(
        &self,
        query: &PrayerTimesUploadQuery,
        file: &UploadFile,
    ) -> Result<ApiResponse<PrayerTimeUploadOut>> {
        self.reply(
            ops::UPLOAD_PRAYER_TIMES,
            None,
            json!({ "query": query, "file_name": file.name, "size": file.size() }),
        )
    }

    async fn get_calculation_methods(&self) -> Result<ApiResponse<Vec<CalculationMethodOut>>> {
        self.reply(ops::GET_CALCULATION_METHODS, None, Value::Null)
    }

    async fn get_mosque(&self, mosque_id: &str) -> Result<ApiResponse<MosqueOut>> {
        self.reply(ops::GET_MOSQUE, Some(mosque_id), Value::Null)
    }

    async fn update_mosque(
        &self,
        mosque_id: &str,
        body: &MosqueUpdate,
    ) -> Result<ApiResponse<MosqueOut>> {
        self.reply(ops::UPDATE_MOSQUE, Some(mosque_id), to_json(body))
    }
}

/// Identifier of the mosque used across fixtures
pub const TEST_MOSQUE_ID: &str = "6f1c2a9e-3b7d-4c1e-9a55-0d2f8e7b4c10";

#[must_use]
pub fn create_test_prayer_config(id: &str) -> PrayerConfigurationOut {
    PrayerConfigurationOut {
        id: id.to_string(),
        mosque_id: TEST_MOSQUE_ID.to_string(),
        calculation_method: 2,
        school: Some(School::Shafi),
        midnight_mode: None,
        latitude_adjustment_method: None,
        tune: true,
        tunes: PrayerTune {
            fajr_tune: Some(2),
            isha_tune: Some(-1),
            ..PrayerTune::default()
        },
        fajr_angle: Some(18.0),
        maghrib_angle: None,
        isha_angle: Some(17.0),
        shafaq: None,
        calendar_method: None,
        adjustment: None,
    }
}

#[must_use]
pub fn create_test_prayer_configs(count: usize) -> Paginated<PrayerConfigurationOut> {
    Paginated::single_page(
        (0..count)
            .map(|i| create_test_prayer_config(&format!("cfg-{i}")))
            .collect(),
    )
}

#[must_use]
pub fn create_test_iqama(id: &str, prayer_name: PrayerName) -> PrayerIqamaOut {
    PrayerIqamaOut {
        id: id.to_string(),
        mosque_id: TEST_MOSQUE_ID.to_string(),
        prayer_name,
        mode: IqamaMode::Offset,
        offset_minutes: Some(10),
        fixed_time: None,
    }
}

#[must_use]
pub fn create_test_event(id: &str) -> EventOut {
    EventOut {
        id: id.to_string(),
        mosque_id: TEST_MOSQUE_ID.to_string(),
        title: "Friday halaqa".to_string(),
        description: Some("Weekly study circle".to_string()),
        start_time: Utc
            .with_ymd_and_hms(2024, 3, 15, 19, 30, 0)
            .single()
            .unwrap_or_default(),
        end_time: None,
        language: Some("en".to_string()),
    }
}

#[must_use]
pub fn create_test_mosque() -> MosqueOut {
    MosqueOut {
        id: TEST_MOSQUE_ID.to_string(),
        name: "Masjid an-Nur".to_string(),
        address: Some("1 High Street".to_string()),
        city: Some("Leeds".to_string()),
        country: Some("United Kingdom".to_string()),
        latitude: Some(53.8),
        longitude: Some(-1.55),
        timezone: Some("Europe/London".to_string()),
    }
}

#[must_use]
pub fn create_test_daily_times(date: NaiveDate) -> DailyPrayerTimes {
    DailyPrayerTimes {
        date,
        fajr: "05:02".to_string(),
        sunrise: "06:31".to_string(),
        dhuhr: "12:15".to_string(),
        asr: "15:20".to_string(),
        maghrib: "17:58".to_string(),
        isha: "19:25".to_string(),
        hijri_date: None,
    }
}
