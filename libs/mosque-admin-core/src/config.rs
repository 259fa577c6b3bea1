//! Admin configuration
//!
//! Sources are layered by [`crate::config_loader::ConfigLoader`]: defaults,
//! then configuration files, then `MOSQUE_ADMIN_*` environment variables.

use crate::cache::QueryCacheConfig;
use crate::error::{AdminError, Result};
use crate::observability::{ObservabilityConfig, VALID_LOG_LEVELS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the mosque managed by this admin instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosqueSettings {
    /// Mosque selected when the admin starts
    pub default_mosque_id: Option<String>,
    /// Display name shown in the admin header
    pub mosque_name: Option<String>,
}

/// Complete admin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub cache: QueryCacheConfig,
    pub observability: ObservabilityConfig,
    pub mosque: MosqueSettings,
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AdminError::configuration(format!("Invalid {name} value")))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AdminConfig {
    /// Configuration built from defaults and environment variables only
    ///
    /// # Errors
    /// Returns an error if an environment variable has an invalid value
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override fields from `MOSQUE_ADMIN_*` environment variables
    ///
    /// Only variables that are set are applied.
    ///
    /// # Errors
    /// Returns an error if a numeric variable cannot be parsed
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("MOSQUE_ADMIN_CACHE_MAX_CAPACITY") {
            self.cache.max_capacity = parse_env("MOSQUE_ADMIN_CACHE_MAX_CAPACITY", &value)?;
        }
        if let Ok(value) = std::env::var("MOSQUE_ADMIN_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_env("MOSQUE_ADMIN_CACHE_TTL_SECS", &value)?;
        }
        if let Ok(value) = std::env::var("MOSQUE_ADMIN_CACHE_TTI_SECS") {
            self.cache.tti_secs = parse_env("MOSQUE_ADMIN_CACHE_TTI_SECS", &value)?;
        }

        if let Ok(level) = std::env::var("MOSQUE_ADMIN_LOG_LEVEL") {
            self.observability.log_level = level.trim().to_lowercase();
        }
        if let Ok(json) = std::env::var("MOSQUE_ADMIN_JSON_LOGS") {
            self.observability.json_logs = parse_bool(&json);
        }
        if let Ok(name) = std::env::var("MOSQUE_ADMIN_SERVICE_NAME") {
            self.observability.service_name = name;
        }

        if let Ok(id) = std::env::var("MOSQUE_ADMIN_DEFAULT_MOSQUE_ID") {
            self.mosque.default_mosque_id = non_empty(id);
        }
        if let Ok(name) = std::env::var("MOSQUE_ADMIN_MOSQUE_NAME") {
            self.mosque.mosque_name = non_empty(name);
        }

        Ok(())
    }

    /// Load configuration from a JSON or YAML file
    ///
    /// The format is chosen by extension: `.yaml`/`.yml` are YAML, anything
    /// else is JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AdminError::Io(std::io::Error::other(format!(
                "Failed to read config file {}: {e}",
                path.display()
            )))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml" | "yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                AdminError::configuration(format!("Failed to parse YAML config: {e}"))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                AdminError::configuration(format!("Failed to parse JSON config: {e}"))
            })?
        };

        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path to save the configuration file
    /// * `format` - Format to save as ("json" or "yaml")
    ///
    /// # Errors
    /// Returns an error for an unsupported format or if the file cannot be written
    pub fn to_file<P: AsRef<Path>>(&self, path: P, format: &str) -> Result<()> {
        let path = path.as_ref();
        let content = match format {
            "yaml" | "yml" => serde_yaml::to_string(self).map_err(|e| {
                AdminError::configuration(format!("Failed to serialize YAML: {e}"))
            })?,
            "json" => serde_json::to_string_pretty(self)?,
            _ => {
                return Err(AdminError::configuration(format!(
                    "Unsupported format: {format}"
                )))
            }
        };

        std::fs::write(path, content).map_err(|e| {
            AdminError::Io(std::io::Error::other(format!(
                "Failed to write config file {}: {e}",
                path.display()
            )))
        })?;

        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns a configuration error describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;

        if !VALID_LOG_LEVELS.contains(&self.observability.log_level.as_str()) {
            return Err(AdminError::configuration(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.observability.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        if self.observability.service_name.trim().is_empty() {
            return Err(AdminError::configuration("Service name cannot be empty"));
        }

        if let Some(id) = &self.mosque.default_mosque_id {
            if !mosque_admin_common::is_valid_uuid(id) {
                return Err(AdminError::configuration(format!(
                    "Default mosque ID is not a valid UUID: {id}"
                )));
            }
        }

        Ok(())
    }

    /// Merge another configuration into this one
    ///
    /// Fields of `other` that differ from their defaults win; fields left at
    /// their defaults do not override earlier sources.
    pub fn merge_with(&mut self, other: &AdminConfig) {
        let defaults = AdminConfig::default();

        if other.cache.max_capacity != defaults.cache.max_capacity {
            self.cache.max_capacity = other.cache.max_capacity;
        }
        if other.cache.ttl_secs != defaults.cache.ttl_secs {
            self.cache.ttl_secs = other.cache.ttl_secs;
        }
        if other.cache.tti_secs != defaults.cache.tti_secs {
            self.cache.tti_secs = other.cache.tti_secs;
        }

        if other.observability.log_level != defaults.observability.log_level {
            self.observability.log_level = other.observability.log_level.clone();
        }
        if other.observability.json_logs != defaults.observability.json_logs {
            self.observability.json_logs = other.observability.json_logs;
        }
        if other.observability.service_name != defaults.observability.service_name {
            self.observability.service_name = other.observability.service_name.clone();
        }

        if other.mosque.default_mosque_id.is_some() {
            self.mosque.default_mosque_id = other.mosque.default_mosque_id.clone();
        }
        if other.mosque.mosque_name.is_some() {
            self.mosque.mosque_name = other.mosque.mosque_name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const MOSQUE_ID: &str = "6f1c2a9e-3b7d-4c1e-9a55-0d2f8e7b4c10";

    #[test]
    fn test_default_config_is_valid() {
        let config = AdminConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.max_capacity, 1000);
        assert_eq!(config.mosque, MosqueSettings::default());
    }

    #[test]
    fn test_validation_rules() {
        let mut config = AdminConfig::default();
        config.cache.max_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.cache.tti_secs = config.cache.ttl_secs + 1;
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.cache.tti_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.observability.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.mosque.default_mosque_id = Some("not-a-uuid".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AdminConfig::default();
        config.observability.json_logs = true;
        config.mosque.mosque_name = Some("Leeds Grand Mosque".to_string());

        for (name, format) in [("admin.json", "json"), ("admin.yaml", "yaml")] {
            let path = temp_dir.path().join(name);
            config.to_file(&path, format).unwrap();
            assert_eq!(AdminConfig::from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("admin.yml");
        std::fs::write(&path, "cache:\n  max_capacity: 50\n").unwrap();

        let config = AdminConfig::from_file(&path).unwrap();
        assert_eq!(config.cache.max_capacity, 50);
        assert_eq!(config.cache.ttl_secs, QueryCacheConfig::default().ttl_secs);
        assert_eq!(config.observability, ObservabilityConfig::default());
    }

    #[test]
    fn test_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let err = AdminConfig::default()
            .to_file(temp_dir.path().join("admin.toml"), "toml")
            .unwrap_err();
        assert!(matches!(err, AdminError::Configuration { .. }));
    }

    #[test]
    fn test_merge_keeps_earlier_values_for_defaulted_fields() {
        let mut base = AdminConfig::default();
        base.cache.max_capacity = 10;
        base.mosque.mosque_name = Some("Base".to_string());

        let mut other = AdminConfig::default();
        other.observability.log_level = "debug".to_string();

        base.merge_with(&other);
        assert_eq!(base.cache.max_capacity, 10);
        assert_eq!(base.observability.log_level, "debug");
        assert_eq!(base.mosque.mosque_name.as_deref(), Some("Base"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("MOSQUE_ADMIN_CACHE_MAX_CAPACITY", "25");
        std::env::set_var("MOSQUE_ADMIN_JSON_LOGS", "yes");
        std::env::set_var("MOSQUE_ADMIN_DEFAULT_MOSQUE_ID", MOSQUE_ID);

        let config = AdminConfig::from_env().unwrap();
        assert_eq!(config.cache.max_capacity, 25);
        assert!(config.observability.json_logs);
        assert_eq!(config.mosque.default_mosque_id.as_deref(), Some(MOSQUE_ID));

        std::env::remove_var("MOSQUE_ADMIN_CACHE_MAX_CAPACITY");
        std::env::remove_var("MOSQUE_ADMIN_JSON_LOGS");
        std::env::remove_var("MOSQUE_ADMIN_DEFAULT_MOSQUE_ID");
    }

    #[test]
    #[serial]
    fn test_oversized_env_ttl_fails_validation() {
        std::env::set_var("MOSQUE_ADMIN_CACHE_TTL_SECS", u64::MAX.to_string());
        let config = AdminConfig::from_env();
        std::env::remove_var("MOSQUE_ADMIN_CACHE_TTL_SECS");

        let config = config.unwrap();
        assert_eq!(config.cache.ttl_secs, u64::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_invalid_env_number() {
        std::env::set_var("MOSQUE_ADMIN_CACHE_TTL_SECS", "soon");
        let err = AdminConfig::from_env().unwrap_err();
        std::env::remove_var("MOSQUE_ADMIN_CACHE_TTL_SECS");
        assert!(err.to_string().contains("MOSQUE_ADMIN_CACHE_TTL_SECS"));
    }
}
