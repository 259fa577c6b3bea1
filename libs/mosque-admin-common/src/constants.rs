//! Constants for the mosque admin client

/// Cache root for event listings
pub const EVENTS_ROOT: &str = "events";

/// Cache root for prayer calculation configurations
pub const PRAYER_CONFIG_ROOT: &str = "prayer-config";

/// Cache root for iqama settings
pub const PRAYER_IQAMA_ROOT: &str = "prayer-iqama";

/// Cache root for computed and uploaded prayer times
pub const PRAYER_TIMES_ROOT: &str = "prayer-times";

/// Cache root for the calculation method catalogue
pub const CALCULATION_METHODS_ROOT: &str = "calculation-methods";

/// Cache root for mosque details
pub const MOSQUES_ROOT: &str = "mosques";

/// Maximum accepted timetable upload size (10 MiB)
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// MIME types accepted for timetable uploads
pub const ACCEPTED_UPLOAD_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// File extensions accepted for timetable uploads
pub const ACCEPTED_UPLOAD_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

/// Earliest year a timetable may be uploaded for
pub const MIN_UPLOAD_YEAR: i32 = 2000;

/// Latest year a timetable may be uploaded for
pub const MAX_UPLOAD_YEAR: i32 = 2100;

/// Iqama offsets are bounded to two hours either side of the adhan
pub const MAX_IQAMA_OFFSET_MINUTES: i32 = 120;

/// Clock format used for fixed iqama times
pub const TIME_FORMAT: &str = "%H:%M";

/// Default fixed iqama time offered by a blank form
pub const DEFAULT_FIXED_IQAMA_TIME: &str = "06:00";

/// Error text longer than this is truncated in log lines
pub const MAX_LOGGED_ERROR_LENGTH: usize = 500;
