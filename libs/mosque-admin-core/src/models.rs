//! Wire models exchanged with the mosque REST API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

impl<T> Paginated<T> {
    /// A single page holding every item
    #[must_use]
    pub fn single_page(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        let size = u32::try_from(items.len()).unwrap_or(u32::MAX);
        Self {
            items,
            total,
            page: 1,
            size,
            pages: 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOut {
    pub id: String,
    pub mosque_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Filters for listing a mosque's events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventListQuery {
    pub lang: Option<String>,
    pub upcoming: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Event creation is expressed through query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventQuery {
    pub mosque_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTranslationQuery {
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTranslationIn {
    pub title: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Prayer configuration
// ---------------------------------------------------------------------------

/// Error for a numeric or textual code outside an enum's range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown code: {0}")]
pub struct UnknownCode(pub String);

/// Juristic school used for the asr shadow ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum School {
    Shafi,
    Hanafi,
}

impl TryFrom<u8> for School {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Shafi),
            1 => Ok(Self::Hanafi),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

impl From<School> for u8 {
    fn from(school: School) -> Self {
        match school {
            School::Shafi => 0,
            School::Hanafi => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MidnightMode {
    Standard,
    Jafari,
}

impl TryFrom<u8> for MidnightMode {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Jafari),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

impl From<MidnightMode> for u8 {
    fn from(mode: MidnightMode) -> Self {
        match mode {
            MidnightMode::Standard => 0,
            MidnightMode::Jafari => 1,
        }
    }
}

/// High-latitude correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LatitudeAdjustmentMethod {
    MiddleOfTheNight,
    OneSeventh,
    AngleBased,
}

impl TryFrom<u8> for LatitudeAdjustmentMethod {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::MiddleOfTheNight),
            2 => Ok(Self::OneSeventh),
            3 => Ok(Self::AngleBased),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

impl From<LatitudeAdjustmentMethod> for u8 {
    fn from(method: LatitudeAdjustmentMethod) -> Self {
        match method {
            LatitudeAdjustmentMethod::MiddleOfTheNight => 1,
            LatitudeAdjustmentMethod::OneSeventh => 2,
            LatitudeAdjustmentMethod::AngleBased => 3,
        }
    }
}

/// Twilight colour used for isha under the Moonsighting Committee method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shafaq {
    General,
    Ahmer,
    Abyad,
}

impl Shafaq {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Ahmer => "ahmer",
            Self::Abyad => "abyad",
        }
    }
}

impl FromStr for Shafaq {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "ahmer" => Ok(Self::Ahmer),
            "abyad" => Ok(Self::Abyad),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

/// Hijri calendar computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarMethod {
    #[serde(rename = "HJCoSA")]
    Hjcosa,
    #[serde(rename = "UAQ")]
    Uaq,
    #[serde(rename = "DIYANET")]
    Diyanet,
    #[serde(rename = "MATHEMATICAL")]
    Mathematical,
}

impl CalendarMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hjcosa => "HJCoSA",
            Self::Uaq => "UAQ",
            Self::Diyanet => "DIYANET",
            Self::Mathematical => "MATHEMATICAL",
        }
    }
}

impl FromStr for CalendarMethod {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HJCoSA" => Ok(Self::Hjcosa),
            "UAQ" => Ok(Self::Uaq),
            "DIYANET" => Ok(Self::Diyanet),
            "MATHEMATICAL" => Ok(Self::Mathematical),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

/// A prayer-time calculation method offered by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationMethodOut {
    pub id: u8,
    pub name: String,
}

/// Per-prayer minute adjustments, only meaningful when tuning is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTune {
    pub imsak_tune: Option<i32>,
    pub fajr_tune: Option<i32>,
    pub sunrise_tune: Option<i32>,
    pub dhuhr_tune: Option<i32>,
    pub asr_tune: Option<i32>,
    pub maghrib_tune: Option<i32>,
    pub isha_tune: Option<i32>,
    pub midnight_tune: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerConfigurationOut {
    pub id: String,
    pub mosque_id: String,
    pub calculation_method: u8,
    #[serde(default)]
    pub school: Option<School>,
    #[serde(default)]
    pub midnight_mode: Option<MidnightMode>,
    #[serde(default)]
    pub latitude_adjustment_method: Option<LatitudeAdjustmentMethod>,
    #[serde(default)]
    pub tune: bool,
    #[serde(flatten)]
    pub tunes: PrayerTune,
    #[serde(default)]
    pub fajr_angle: Option<f64>,
    #[serde(default)]
    pub maghrib_angle: Option<f64>,
    #[serde(default)]
    pub isha_angle: Option<f64>,
    #[serde(default)]
    pub shafaq: Option<Shafaq>,
    #[serde(default)]
    pub calendar_method: Option<CalendarMethod>,
    #[serde(default)]
    pub adjustment: Option<i32>,
}

/// Body for creating a prayer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerConfigurationIn {
    pub calculation_method: u8,
    pub school: Option<School>,
    pub midnight_mode: Option<MidnightMode>,
    pub latitude_adjustment_method: Option<LatitudeAdjustmentMethod>,
    pub tune: bool,
    #[serde(flatten)]
    pub tunes: PrayerTune,
    pub fajr_angle: Option<f64>,
    pub maghrib_angle: Option<f64>,
    pub isha_angle: Option<f64>,
    pub shafaq: Option<Shafaq>,
    pub calendar_method: Option<CalendarMethod>,
    pub adjustment: Option<i32>,
}

/// Body for updating a prayer configuration; absent fields are left as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerConfigurationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_method: Option<u8>,
    pub school: Option<School>,
    pub midnight_mode: Option<MidnightMode>,
    pub latitude_adjustment_method: Option<LatitudeAdjustmentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tune: Option<bool>,
    #[serde(flatten)]
    pub tunes: PrayerTune,
    pub fajr_angle: Option<f64>,
    pub maghrib_angle: Option<f64>,
    pub isha_angle: Option<f64>,
    pub shafaq: Option<Shafaq>,
    pub calendar_method: Option<CalendarMethod>,
    pub adjustment: Option<i32>,
}

impl From<PrayerConfigurationIn> for PrayerConfigurationUpdate {
    fn from(body: PrayerConfigurationIn) -> Self {
        Self {
            calculation_method: Some(body.calculation_method),
            school: body.school,
            midnight_mode: body.midnight_mode,
            latitude_adjustment_method: body.latitude_adjustment_method,
            tune: Some(body.tune),
            tunes: body.tunes,
            fajr_angle: body.fajr_angle,
            maghrib_angle: body.maghrib_angle,
            isha_angle: body.isha_angle,
            shafaq: body.shafaq,
            calendar_method: body.calendar_method,
            adjustment: body.adjustment,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerConfigQuery {
    pub mosque_id: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

// ---------------------------------------------------------------------------
// Iqama
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fajr => "fajr",
            Self::Dhuhr => "dhuhr",
            Self::Asr => "asr",
            Self::Maghrib => "maghrib",
            Self::Isha => "isha",
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }
}

impl FromStr for PrayerName {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

/// How an iqama time is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IqamaMode {
    /// Minutes after (or before) the adhan
    Offset,
    /// A fixed wall-clock time
    Fixed,
}

impl IqamaMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Fixed => "fixed",
        }
    }
}

impl FromStr for IqamaMode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offset" => Ok(Self::Offset),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerIqamaOut {
    pub id: String,
    pub mosque_id: String,
    pub prayer_name: PrayerName,
    pub mode: IqamaMode,
    #[serde(default)]
    pub offset_minutes: Option<i32>,
    #[serde(default)]
    pub fixed_time: Option<String>,
}

/// Body for creating or updating an iqama setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerIqamaIn {
    pub mosque_id: String,
    pub prayer_name: PrayerName,
    pub mode: IqamaMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_minutes: Option<i32>,
    /// `HH:MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Prayer times
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPrayerTimes {
    pub date: NaiveDate,
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
    #[serde(default)]
    pub hijri_date: Option<String>,
}

/// Computed prayer times for an arbitrary location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimesQuery {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub hijri: Option<bool>,
    pub hijri_adjustment: Option<i32>,
    pub method: Option<u8>,
}

impl PrayerTimesQuery {
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            latitude: None,
            longitude: None,
            timezone: None,
            hijri: None,
            hijri_adjustment: None,
            method: None,
        }
    }
}

/// Where a mosque's prayer times come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerTimesSource {
    Calculated,
    Uploaded,
}

impl PrayerTimesSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calculated => "calculated",
            Self::Uploaded => "uploaded",
        }
    }
}

/// A mosque's own prayer times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosquePrayerTimesQuery {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hijri: Option<bool>,
    pub source: Option<PrayerTimesSource>,
}

impl MosquePrayerTimesQuery {
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            hijri: None,
            source: None,
        }
    }
}

/// Timetable file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFileType {
    Csv,
    Xls,
}

impl UploadFileType {
    /// Detect from a file name: `.xls`/`.xlsx` are spreadsheets, anything else is CSV
    #[must_use]
    pub fn detect(file_name: &str) -> Self {
        match mosque_admin_common::file_extension(file_name).as_deref() {
            Some("xls" | "xlsx") => Self::Xls,
            _ => Self::Csv,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xls => "xls",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimesUploadQuery {
    pub mosque_id: String,
    pub year: i32,
    pub file_type: UploadFileType,
}

/// A timetable file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimeUploadOut {
    pub id: String,
    pub mosque_id: String,
    pub year: i32,
    pub rows_imported: u32,
}

// ---------------------------------------------------------------------------
// Mosque
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosqueOut {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosqueUpdate {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}
