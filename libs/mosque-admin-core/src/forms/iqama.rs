//! Iqama form

use super::{parse_optional, require};
use crate::error::FieldErrors;
use crate::models::{IqamaMode, PrayerIqamaIn, PrayerIqamaOut, PrayerName};
use mosque_admin_common::{
    format_hh_mm, parse_hh_mm, DEFAULT_FIXED_IQAMA_TIME, MAX_IQAMA_OFFSET_MINUTES,
};
use serde::{Deserialize, Serialize};

/// Raw state of the iqama editor
///
/// Only the field belonging to the selected mode is sent: `offset_minutes`
/// in offset mode, `fixed_time` in fixed mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IqamaForm {
    pub mosque_id: String,
    pub prayer_name: PrayerName,
    pub mode: IqamaMode,
    pub offset_minutes: String,
    pub fixed_time: String,
}

impl IqamaForm {
    /// Blank form for `mosque_id`
    #[must_use]
    pub fn new(mosque_id: impl Into<String>) -> Self {
        Self {
            mosque_id: mosque_id.into(),
            prayer_name: PrayerName::Fajr,
            mode: IqamaMode::Offset,
            offset_minutes: "0".to_string(),
            fixed_time: DEFAULT_FIXED_IQAMA_TIME.to_string(),
        }
    }

    /// Form hydrated from an existing setting, or blank when there is none
    #[must_use]
    pub fn from_iqama(mosque_id: impl Into<String>, existing: Option<&PrayerIqamaOut>) -> Self {
        let mut form = Self::new(mosque_id);
        if let Some(iqama) = existing {
            form.prayer_name = iqama.prayer_name;
            form.mode = iqama.mode;
            if let Some(offset) = iqama.offset_minutes {
                form.offset_minutes = offset.to_string();
            }
            if let Some(time) = &iqama.fixed_time {
                form.fixed_time.clone_from(time);
            }
        }
        form
    }

    /// Convert to a create/update payload
    ///
    /// # Errors
    /// Returns field errors for a missing mosque, an offset that is not a
    /// whole number within two hours, or a fixed time that is not `HH:MM`
    pub fn to_payload(&self) -> Result<PrayerIqamaIn, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "mosque_id", &self.mosque_id, "Mosque ID is required");

        let (offset_minutes, fixed_time) = match self.mode {
            IqamaMode::Offset => (self.parse_offset(&mut errors), None),
            IqamaMode::Fixed => (None, self.parse_fixed_time(&mut errors)),
        };

        errors.into_result(PrayerIqamaIn {
            mosque_id: self.mosque_id.trim().to_string(),
            prayer_name: self.prayer_name,
            mode: self.mode,
            offset_minutes,
            fixed_time,
        })
    }

    fn parse_offset(&self, errors: &mut FieldErrors) -> Option<i32> {
        require(errors, "offset_minutes", &self.offset_minutes, "Offset is required");
        let offset = parse_optional::<i32>(
            errors,
            "offset_minutes",
            &self.offset_minutes,
            "Offset must be a whole number of minutes",
        )?;
        if offset.abs() > MAX_IQAMA_OFFSET_MINUTES {
            errors.insert(
                "offset_minutes",
                format!(
                    "Offset must be between -{MAX_IQAMA_OFFSET_MINUTES} and {MAX_IQAMA_OFFSET_MINUTES} minutes"
                ),
            );
            return None;
        }
        Some(offset)
    }

    fn parse_fixed_time(&self, errors: &mut FieldErrors) -> Option<String> {
        match parse_hh_mm(&self.fixed_time) {
            Ok(time) => Some(format_hh_mm(&time)),
            Err(_) => {
                errors.insert("fixed_time", "Time must be in HH:MM format");
                None
            }
        }
    }
}
