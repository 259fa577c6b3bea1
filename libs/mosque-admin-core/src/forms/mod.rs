//! Typed form-state to payload transforms
//!
//! Each form keeps the raw text a user typed and converts it into an API
//! payload in one step, returning either the payload or the full set of
//! field errors. Validation failures never reach the network.

pub mod iqama;
pub mod mosque;
pub mod prayer_config;
pub mod prayer_times;
pub mod upload;

pub use iqama::IqamaForm;
pub use mosque::MosqueForm;
pub use prayer_config::PrayerConfigForm;
pub use prayer_times::PrayerTimesQueryForm;
pub use upload::{validate_upload_file, PrayerTimesUploadForm};

use crate::error::FieldErrors;
use std::str::FromStr;

/// Parse an optional number; blank input is `None`
pub(crate) fn parse_optional<T: FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    message: &str,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.insert(field, message);
            None
        }
    }
}

/// Parse an optional finite float; blank input is `None`
pub(crate) fn parse_optional_f64(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<f64> {
    match parse_optional::<f64>(errors, field, raw, "Must be a number") {
        Some(value) if !value.is_finite() => {
            errors.insert(field, "Must be a number");
            None
        }
        other => other,
    }
}

/// Record an error when a required text field is blank
pub(crate) fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}
