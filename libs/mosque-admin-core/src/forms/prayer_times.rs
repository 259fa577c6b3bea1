//! Prayer-times lookup form

use super::{parse_optional, parse_optional_f64, require};
use crate::error::FieldErrors;
use crate::models::{MosquePrayerTimesQuery, PrayerTimesQuery, PrayerTimesSource};
use chrono::{Datelike, NaiveDate};

/// Raw state of the prayer-times lookup form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrayerTimesQueryForm {
    pub year: String,
    pub month: String,
    pub day: String,
    pub latitude: String,
    pub longitude: String,
    pub timezone: String,
    pub hijri: bool,
    pub hijri_adjustment: String,
    pub method: String,
    pub source: Option<PrayerTimesSource>,
}

impl PrayerTimesQueryForm {
    /// Form preset to the month containing `today`
    #[must_use]
    pub fn for_month_of(today: NaiveDate) -> Self {
        Self {
            year: today.year().to_string(),
            month: today.month().to_string(),
            ..Self::default()
        }
    }

    fn parse_date_parts(&self, errors: &mut FieldErrors) -> (i32, Option<u32>, Option<u32>) {
        require(errors, "year", &self.year, "Year is required");
        let year = parse_optional::<i32>(errors, "year", &self.year, "Year must be a number")
            .unwrap_or_default();

        let month = parse_optional::<u32>(errors, "month", &self.month, "Month must be a number");
        if month.is_some_and(|m| !(1..=12).contains(&m)) {
            errors.insert("month", "Month must be between 1 and 12");
        }

        let day = parse_optional::<u32>(errors, "day", &self.day, "Day must be a number");
        if day.is_some_and(|d| !(1..=31).contains(&d)) {
            errors.insert("day", "Day must be between 1 and 31");
        }

        (year, month, day)
    }

    /// Query for computed prayer times at an arbitrary location
    ///
    /// # Errors
    /// Returns field errors for a missing year or malformed numbers
    pub fn to_query(&self) -> Result<PrayerTimesQuery, FieldErrors> {
        let mut errors = FieldErrors::new();
        let (year, month, day) = self.parse_date_parts(&mut errors);

        let latitude = parse_optional_f64(&mut errors, "latitude", &self.latitude);
        let longitude = parse_optional_f64(&mut errors, "longitude", &self.longitude);
        let hijri_adjustment = parse_optional::<i32>(
            &mut errors,
            "hijri_adjustment",
            &self.hijri_adjustment,
            "Hijri adjustment must be a whole number",
        );
        let method = parse_optional::<u8>(
            &mut errors,
            "method",
            &self.method,
            "Invalid calculation method",
        );
        let timezone = Some(self.timezone.trim())
            .filter(|tz| !tz.is_empty())
            .map(str::to_string);

        errors.into_result(PrayerTimesQuery {
            year,
            month,
            day,
            latitude,
            longitude,
            timezone,
            hijri: Some(self.hijri),
            hijri_adjustment,
            method,
        })
    }

    /// Query for a mosque's own prayer times
    ///
    /// # Errors
    /// Returns field errors for a missing year or malformed date parts
    pub fn to_mosque_query(&self) -> Result<MosquePrayerTimesQuery, FieldErrors> {
        let mut errors = FieldErrors::new();
        let (year, month, day) = self.parse_date_parts(&mut errors);
        errors.into_result(MosquePrayerTimesQuery {
            year,
            month,
            day,
            hijri: Some(self.hijri),
            source: self.source,
        })
    }
}
