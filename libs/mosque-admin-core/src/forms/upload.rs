//! Prayer-times upload form

use super::require;
use crate::error::FieldErrors;
use crate::models::{PrayerTimesUploadQuery, UploadFile, UploadFileType};
use crate::resources::prayer_times_upload::UploadPrayerTimes;
use mosque_admin_common::{
    file_extension, ACCEPTED_UPLOAD_EXTENSIONS, ACCEPTED_UPLOAD_MIME_TYPES, MAX_UPLOAD_SIZE,
    MAX_UPLOAD_YEAR, MIN_UPLOAD_YEAR,
};

/// Check a timetable file's size and format
///
/// A file is accepted when its content type is CSV/Excel or its name ends in
/// one of the accepted extensions.
///
/// # Errors
/// Returns the user-facing reason the file was rejected
pub fn validate_upload_file(file: &UploadFile) -> Result<(), &'static str> {
    if file.size() > MAX_UPLOAD_SIZE {
        return Err("File size must be less than 10MB");
    }

    let mime_ok = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ACCEPTED_UPLOAD_MIME_TYPES.contains(&ct));
    let extension_ok = file_extension(&file.name)
        .is_some_and(|ext| ACCEPTED_UPLOAD_EXTENSIONS.contains(&ext.as_str()));

    if mime_ok || extension_ok {
        Ok(())
    } else {
        Err("Only CSV and Excel files are accepted")
    }
}

/// State of the upload page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerTimesUploadForm {
    pub mosque_id: String,
    pub year: i32,
    /// Explicit file type; detected from the file name when unset
    pub file_type: Option<UploadFileType>,
    pub file: Option<UploadFile>,
}

impl PrayerTimesUploadForm {
    #[must_use]
    pub fn new(mosque_id: impl Into<String>, year: i32) -> Self {
        Self {
            mosque_id: mosque_id.into(),
            year,
            file_type: None,
            file: None,
        }
    }

    /// Attach a file, detecting its type from the name
    #[must_use]
    pub fn with_file(mut self, file: UploadFile) -> Self {
        self.file_type = Some(UploadFileType::detect(&file.name));
        self.file = Some(file);
        self
    }

    /// Validate and turn into an upload request
    ///
    /// # Errors
    /// Returns field errors for a missing mosque, a year outside 2000–2100,
    /// or a missing, oversized or unsupported file
    pub fn into_request(self) -> Result<UploadPrayerTimes, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "mosque_id", &self.mosque_id, "Mosque ID is required");

        if self.year < MIN_UPLOAD_YEAR {
            errors.insert("year", format!("Year must be {MIN_UPLOAD_YEAR} or later"));
        } else if self.year > MAX_UPLOAD_YEAR {
            errors.insert("year", format!("Year must be {MAX_UPLOAD_YEAR} or earlier"));
        }

        let Some(file) = self.file else {
            errors.insert("file", "Please upload a file");
            return Err(errors);
        };
        if let Err(message) = validate_upload_file(&file) {
            errors.insert("file", message);
        }

        let file_type = self
            .file_type
            .unwrap_or_else(|| UploadFileType::detect(&file.name));

        errors.into_result(UploadPrayerTimes {
            query: PrayerTimesUploadQuery {
                mosque_id: self.mosque_id.trim().to_string(),
                year: self.year,
                file_type,
            },
            file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TEST_MOSQUE_ID;

    fn csv(name: &str, size: usize) -> UploadFile {
        UploadFile::new(name, Some("text/csv"), vec![b'x'; size])
    }

    #[test]
    fn test_valid_upload() {
        let request = PrayerTimesUploadForm::new(TEST_MOSQUE_ID, 2024)
            .with_file(csv("times.csv", 128))
            .into_request()
            .unwrap();
        assert_eq!(request.query.year, 2024);
        assert_eq!(request.query.file_type, UploadFileType::Csv);
        assert_eq!(request.file.size(), 128);
    }

    #[test]
    fn test_file_type_detected_from_extension() {
        let file = UploadFile::new("times.xlsx", None, vec![1, 2, 3]);
        let request = PrayerTimesUploadForm::new(TEST_MOSQUE_ID, 2024)
            .with_file(file)
            .into_request()
            .unwrap();
        assert_eq!(request.query.file_type, UploadFileType::Xls);
    }

    #[test]
    fn test_year_bounds() {
        for (year, ok) in [(1999, false), (2000, true), (2100, true), (2101, false)] {
            let result = PrayerTimesUploadForm::new(TEST_MOSQUE_ID, year)
                .with_file(csv("t.csv", 1))
                .into_request();
            assert_eq!(result.is_ok(), ok, "year {year}");
        }
    }

    #[test]
    fn test_missing_file_and_mosque() {
        let errors = PrayerTimesUploadForm::new(" ", 2024)
            .into_request()
            .unwrap_err();
        assert_eq!(errors.get("file"), Some("Please upload a file"));
        assert_eq!(errors.get("mosque_id"), Some("Mosque ID is required"));
    }

    #[test]
    fn test_file_size_limit() {
        let limit = usize::try_from(MAX_UPLOAD_SIZE).unwrap();
        assert!(validate_upload_file(&csv("t.csv", limit)).is_ok());
        assert_eq!(
            validate_upload_file(&csv("t.csv", limit + 1)),
            Err("File size must be less than 10MB")
        );
    }

    #[test]
    fn test_file_format_rules() {
        // Accepted by content type alone
        let by_mime = UploadFile::new("export", Some("application/vnd.ms-excel"), vec![0]);
        assert!(validate_upload_file(&by_mime).is_ok());

        // Accepted by extension alone
        let by_name = UploadFile::new("times.XLS", Some("application/octet-stream"), vec![0]);
        assert!(validate_upload_file(&by_name).is_ok());

        let pdf = UploadFile::new("times.pdf", Some("application/pdf"), vec![0]);
        assert_eq!(
            validate_upload_file(&pdf),
            Err("Only CSV and Excel files are accepted")
        );
    }
}
