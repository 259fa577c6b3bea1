//! Mosque details form

use super::{parse_optional_f64, require};
use crate::error::FieldErrors;
use crate::models::{MosqueOut, MosqueUpdate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosqueForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    pub timezone: String,
}

impl MosqueForm {
    #[must_use]
    pub fn from_mosque(mosque: &MosqueOut) -> Self {
        Self {
            name: mosque.name.clone(),
            address: mosque.address.clone().unwrap_or_default(),
            city: mosque.city.clone().unwrap_or_default(),
            country: mosque.country.clone().unwrap_or_default(),
            latitude: mosque.latitude.unwrap_or_default().to_string(),
            longitude: mosque.longitude.unwrap_or_default().to_string(),
            timezone: mosque.timezone.clone().unwrap_or_default(),
        }
    }

    /// Convert to an update payload
    ///
    /// # Errors
    /// Returns field errors for blank required fields and out-of-range coordinates
    pub fn to_payload(&self) -> Result<MosqueUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        require(&mut errors, "address", &self.address, "Address is required");
        require(&mut errors, "city", &self.city, "City is required");
        require(&mut errors, "country", &self.country, "Country is required");
        require(&mut errors, "timezone", &self.timezone, "Timezone is required");

        let latitude = Self::coordinate(&mut errors, "latitude", &self.latitude, 90.0);
        let longitude = Self::coordinate(&mut errors, "longitude", &self.longitude, 180.0);

        errors.into_result(MosqueUpdate {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            latitude,
            longitude,
            timezone: self.timezone.trim().to_string(),
        })
    }

    fn coordinate(errors: &mut FieldErrors, field: &str, raw: &str, limit: f64) -> f64 {
        let label = if field == "latitude" { "Latitude" } else { "Longitude" };
        match parse_optional_f64(errors, field, raw) {
            Some(value) if value.abs() <= limit => value,
            Some(_) => {
                errors.insert(field, format!("{label} must be between -{limit} and {limit}"));
                0.0
            }
            None => {
                errors.insert(field, format!("{label} is required"));
                0.0
            }
        }
    }
}
