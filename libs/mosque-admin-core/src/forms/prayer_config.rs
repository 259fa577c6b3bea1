//! Prayer configuration form

use super::{parse_optional, parse_optional_f64, require};
use crate::error::FieldErrors;
use crate::models::{
    CalendarMethod, LatitudeAdjustmentMethod, MidnightMode, PrayerConfigurationIn,
    PrayerConfigurationOut, PrayerConfigurationUpdate, PrayerTune, School, Shafaq,
};
use serde::{Deserialize, Serialize};

/// Raw text of the prayer configuration editor
///
/// Every optional field is blank when unset. The `*_tune` fields are only
/// sent when `tune` is on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerConfigForm {
    pub calculation_method: String,
    pub school: String,
    pub midnight_mode: String,
    pub latitude_adjustment_method: String,
    pub tune: bool,
    pub imsak_tune: String,
    pub fajr_tune: String,
    pub sunrise_tune: String,
    pub dhuhr_tune: String,
    pub asr_tune: String,
    pub maghrib_tune: String,
    pub isha_tune: String,
    pub midnight_tune: String,
    pub fajr_angle: String,
    pub maghrib_angle: String,
    pub isha_angle: String,
    pub shafaq: String,
    pub calendar_method: String,
    pub adjustment: String,
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_code<T, E>(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    message: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match parse(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            errors.insert(field, message);
            None
        }
    }
}

fn parse_numeric_code<T: TryFrom<u8>>(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    message: &str,
) -> Option<T> {
    parse_code(errors, field, raw, message, |s| {
        s.parse::<u8>()
            .ok()
            .and_then(|code| T::try_from(code).ok())
            .ok_or(())
    })
}

impl PrayerConfigForm {
    /// Blank form for a new configuration, preselecting `default_method`
    #[must_use]
    pub fn new(default_method: Option<&str>) -> Self {
        Self {
            calculation_method: default_method.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Form hydrated from an existing configuration, or blank when there is none
    #[must_use]
    pub fn from_config(config: Option<&PrayerConfigurationOut>, default_method: Option<&str>) -> Self {
        let Some(config) = config else {
            return Self::new(default_method);
        };

        Self {
            calculation_method: config.calculation_method.to_string(),
            school: opt_to_string(config.school.map(u8::from)),
            midnight_mode: opt_to_string(config.midnight_mode.map(u8::from)),
            latitude_adjustment_method: opt_to_string(config.latitude_adjustment_method.map(u8::from)),
            tune: config.tune,
            imsak_tune: opt_to_string(config.tunes.imsak_tune),
            fajr_tune: opt_to_string(config.tunes.fajr_tune),
            sunrise_tune: opt_to_string(config.tunes.sunrise_tune),
            dhuhr_tune: opt_to_string(config.tunes.dhuhr_tune),
            asr_tune: opt_to_string(config.tunes.asr_tune),
            maghrib_tune: opt_to_string(config.tunes.maghrib_tune),
            isha_tune: opt_to_string(config.tunes.isha_tune),
            midnight_tune: opt_to_string(config.tunes.midnight_tune),
            fajr_angle: opt_to_string(config.fajr_angle),
            maghrib_angle: opt_to_string(config.maghrib_angle),
            isha_angle: opt_to_string(config.isha_angle),
            shafaq: config.shafaq.map(|s| s.as_str().to_string()).unwrap_or_default(),
            calendar_method: config
                .calendar_method
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            adjustment: opt_to_string(config.adjustment),
        }
    }

    fn parse_tunes(&self, errors: &mut FieldErrors) -> PrayerTune {
        if !self.tune {
            return PrayerTune::default();
        }
        let mut tune = |field: &str, raw: &str| {
            parse_optional::<i32>(errors, field, raw, "Tune must be a whole number of minutes")
        };
        PrayerTune {
            imsak_tune: tune("imsak_tune", &self.imsak_tune),
            fajr_tune: tune("fajr_tune", &self.fajr_tune),
            sunrise_tune: tune("sunrise_tune", &self.sunrise_tune),
            dhuhr_tune: tune("dhuhr_tune", &self.dhuhr_tune),
            asr_tune: tune("asr_tune", &self.asr_tune),
            maghrib_tune: tune("maghrib_tune", &self.maghrib_tune),
            isha_tune: tune("isha_tune", &self.isha_tune),
            midnight_tune: tune("midnight_tune", &self.midnight_tune),
        }
    }

    /// Convert to a create payload
    ///
    /// # Errors
    /// Returns every field that failed to parse, plus a missing calculation method
    pub fn to_payload(&self) -> Result<PrayerConfigurationIn, FieldErrors> {
        let mut errors = FieldErrors::new();

        require(
            &mut errors,
            "calculation_method",
            &self.calculation_method,
            "Calculation method is required",
        );
        let calculation_method = parse_optional::<u8>(
            &mut errors,
            "calculation_method",
            &self.calculation_method,
            "Invalid calculation method",
        );

        let payload = PrayerConfigurationIn {
            calculation_method: calculation_method.unwrap_or_default(),
            school: parse_numeric_code::<School>(&mut errors, "school", &self.school, "Invalid school"),
            midnight_mode: parse_numeric_code::<MidnightMode>(
                &mut errors,
                "midnight_mode",
                &self.midnight_mode,
                "Invalid midnight mode",
            ),
            latitude_adjustment_method: parse_numeric_code::<LatitudeAdjustmentMethod>(
                &mut errors,
                "latitude_adjustment_method",
                &self.latitude_adjustment_method,
                "Invalid latitude adjustment method",
            ),
            tune: self.tune,
            tunes: self.parse_tunes(&mut errors),
            fajr_angle: parse_optional_f64(&mut errors, "fajr_angle", &self.fajr_angle),
            maghrib_angle: parse_optional_f64(&mut errors, "maghrib_angle", &self.maghrib_angle),
            isha_angle: parse_optional_f64(&mut errors, "isha_angle", &self.isha_angle),
            shafaq: parse_code(&mut errors, "shafaq", &self.shafaq, "Invalid shafaq", str::parse::<Shafaq>),
            calendar_method: parse_code(
                &mut errors,
                "calendar_method",
                &self.calendar_method,
                "Invalid calendar method",
                str::parse::<CalendarMethod>,
            ),
            adjustment: parse_optional::<i32>(
                &mut errors,
                "adjustment",
                &self.adjustment,
                "Adjustment must be a whole number",
            ),
        };

        errors.into_result(payload)
    }

    /// Convert to an update payload
    ///
    /// # Errors
    /// Same as [`to_payload`](Self::to_payload)
    pub fn to_update_payload(&self) -> Result<PrayerConfigurationUpdate, FieldErrors> {
        self.to_payload().map(PrayerConfigurationUpdate::from)
    }
}
