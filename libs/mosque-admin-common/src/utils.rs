//! Utility functions for the mosque admin client

use crate::constants::TIME_FORMAT;
use chrono::NaiveTime;
use std::path::Path;

/// Parse a wall-clock time in `HH:MM` form
///
/// # Errors
/// Returns `chrono::ParseError` if the string is not a valid 24-hour time
pub fn parse_hh_mm(time_str: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(time_str.trim(), TIME_FORMAT)
}

/// Format a wall-clock time as `HH:MM`
#[must_use]
pub fn format_hh_mm(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Validate a UUID string
#[must_use]
pub fn is_valid_uuid(uuid_str: &str) -> bool {
    uuid::Uuid::parse_str(uuid_str).is_ok()
}

/// Lower-cased extension of a file name, if it has one
#[must_use]
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Truncate a string to a maximum length
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_hh_mm() {
        let time = parse_hh_mm("06:30").unwrap();
        assert_eq!(time.hour(), 6);
        assert_eq!(time.minute(), 30);

        assert!(parse_hh_mm(" 23:59 ").is_ok());
        assert!(parse_hh_mm("24:00").is_err());
        assert!(parse_hh_mm("6").is_err());
        assert!(parse_hh_mm("").is_err());
    }

    #[test]
    fn test_format_hh_mm() {
        let time = NaiveTime::from_hms_opt(5, 7, 0).unwrap();
        assert_eq!(format_hh_mm(&time), "05:07");
    }

    #[test]
    fn test_is_valid_uuid() {
        assert!(is_valid_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_valid_uuid("not-a-uuid"));
        assert!(!is_valid_uuid(""));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("times.CSV").as_deref(), Some("csv"));
        assert_eq!(file_extension("times.2024.xlsx").as_deref(), Some("xlsx"));
        assert_eq!(file_extension("README"), None);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 5), "he...");
        assert_eq!(truncate_string("", 5), "");
        assert_eq!(truncate_string("مسجد النور", 5), "مس...");
    }
}
