//! Configuration Loader
//!
//! Loads [`AdminConfig`] from defaults, configuration files and environment
//! variables, in that order of increasing precedence.

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_FILE_NAMES: [&str; 3] = ["mosque-admin.json", "mosque-admin.yaml", "mosque-admin.yml"];
const CONFIG_DIR_NAME: &str = "mosque-admin";

/// Configuration loader that handles multiple sources with precedence
pub struct ConfigLoader {
    /// Base configuration
    base_config: AdminConfig,
    /// Configuration file paths to try in order
    config_paths: Vec<PathBuf>,
    /// Whether to load from environment variables
    load_from_env: bool,
    /// Whether to validate the final configuration
    validate: bool,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_config: AdminConfig::default(),
            config_paths: Self::get_default_config_paths(),
            load_from_env: true,
            validate: true,
        }
    }

    #[must_use]
    pub fn with_base_config(mut self, config: AdminConfig) -> Self {
        self.base_config = config;
        self
    }

    #[must_use]
    pub fn add_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replace the configuration file paths
    #[must_use]
    pub fn with_config_paths<P: AsRef<Path>>(mut self, paths: Vec<P>) -> Self {
        self.config_paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    #[must_use]
    pub fn without_env_loading(mut self) -> Self {
        self.load_from_env = false;
        self
    }

    #[must_use]
    pub fn with_env_loading(mut self, enabled: bool) -> Self {
        self.load_from_env = enabled;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Load configuration from all sources
    ///
    /// Unreadable or malformed files are skipped with a warning. An invalid
    /// environment variable is an error.
    ///
    /// # Errors
    /// Returns an error if an environment variable is malformed or the final
    /// configuration is invalid
    pub fn load(&self) -> Result<AdminConfig> {
        let mut config = self.base_config.clone();
        info!("Starting configuration loading process");

        for path in &self.config_paths {
            if !path.exists() {
                debug!("Configuration file not found: {}", path.display());
                continue;
            }
            debug!("Loading configuration from file: {}", path.display());
            match AdminConfig::from_file(path) {
                Ok(file_config) => {
                    config.merge_with(&file_config);
                    info!("Successfully loaded configuration from: {}", path.display());
                }
                Err(e) => {
                    warn!(
                        "Failed to load configuration from {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        if self.load_from_env {
            debug!("Loading configuration from environment variables");
            config.apply_env_overrides()?;
        }

        if self.validate {
            debug!("Validating final configuration");
            config.validate()?;
        }

        info!("Configuration loading completed successfully");
        Ok(config)
    }

    /// Default configuration file paths, lowest precedence first
    #[must_use]
    pub fn get_default_config_paths() -> Vec<PathBuf> {
        let system_dir = Self::get_system_config_dir();
        let user_dir = Self::get_user_config_dir();

        let mut paths = Vec::with_capacity(CONFIG_FILE_NAMES.len() * 3);
        paths.extend(CONFIG_FILE_NAMES.iter().map(|name| system_dir.join(name)));
        paths.extend(CONFIG_FILE_NAMES.iter().map(|name| user_dir.join(name)));
        paths.extend(CONFIG_FILE_NAMES.iter().map(PathBuf::from));
        paths
    }

    #[must_use]
    pub fn get_user_config_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME)
        } else if let Ok(userprofile) = std::env::var("USERPROFILE") {
            PathBuf::from(userprofile)
                .join("AppData")
                .join("Roaming")
                .join(CONFIG_DIR_NAME)
        } else {
            PathBuf::from("~/.config").join(CONFIG_DIR_NAME)
        }
    }

    #[must_use]
    pub fn get_system_config_dir() -> PathBuf {
        if cfg!(target_os = "macos") {
            PathBuf::from("/Library/Application Support").join(CONFIG_DIR_NAME)
        } else if cfg!(target_os = "windows") {
            PathBuf::from("C:\\ProgramData").join(CONFIG_DIR_NAME)
        } else {
            PathBuf::from("/etc").join(CONFIG_DIR_NAME)
        }
    }

    /// Write the default configuration as a sample file
    ///
    /// # Arguments
    /// * `path` - Path to create the sample configuration file
    /// * `format` - Format to use ("json" or "yaml")
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created
    pub fn create_sample_config<P: AsRef<Path>>(path: P, format: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AdminError::Io(std::io::Error::other(format!(
                    "Failed to create config directory {}: {e}",
                    parent.display()
                )))
            })?;
        }
        AdminConfig::default().to_file(path, format)?;
        info!("Created sample configuration file: {}", path.display());
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from the default locations and the environment
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config() -> Result<AdminConfig> {
    ConfigLoader::new().load()
}

/// Load configuration with custom paths
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config_with_paths<P: AsRef<Path>>(config_paths: Vec<P>) -> Result<AdminConfig> {
    ConfigLoader::new().with_config_paths(config_paths).load()
}

/// Load configuration from environment variables only
///
/// # Errors
/// Returns an error if configuration cannot be loaded
pub fn load_config_from_env() -> Result<AdminConfig> {
    ConfigLoader::new()
        .with_config_paths::<PathBuf>(vec![])
        .load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_loader_default() {
        let loader = ConfigLoader::new();
        assert!(loader.load_from_env);
        assert!(loader.validate);
        assert_eq!(loader.config_paths.len(), 9);
    }

    #[test]
    fn test_default_paths_end_with_working_directory() {
        let paths = ConfigLoader::get_default_config_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from("mosque-admin.yml")));
        assert!(paths[0].starts_with(ConfigLoader::get_system_config_dir()));
    }

    #[test]
    fn test_config_dirs_are_named_after_the_app() {
        assert!(ConfigLoader::get_user_config_dir().ends_with("mosque-admin"));
        assert!(ConfigLoader::get_system_config_dir().ends_with("mosque-admin"));
    }

    #[test]
    fn test_base_config_without_env() {
        let mut base = AdminConfig::default();
        base.mosque.mosque_name = Some("Test Mosque".to_string());

        let config = ConfigLoader::new()
            .with_base_config(base)
            .with_config_paths::<PathBuf>(vec![])
            .without_env_loading()
            .load()
            .unwrap();
        assert_eq!(config.mosque.mosque_name.as_deref(), Some("Test Mosque"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.json");
        let second = temp_dir.path().join("second.yaml");

        let mut a = AdminConfig::default();
        a.cache.max_capacity = 10;
        a.observability.log_level = "debug".to_string();
        a.to_file(&first, "json").unwrap();

        let mut b = AdminConfig::default();
        b.cache.max_capacity = 20;
        b.to_file(&second, "yaml").unwrap();

        let config = ConfigLoader::new()
            .with_config_paths(vec![&first, &second])
            .without_env_loading()
            .load()
            .unwrap();
        assert_eq!(config.cache.max_capacity, 20);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let broken = temp_dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();

        let config = ConfigLoader::new()
            .with_config_paths(vec![&broken])
            .without_env_loading()
            .load()
            .unwrap();
        assert_eq!(config, AdminConfig::default());
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let mut base = AdminConfig::default();
        base.cache.max_capacity = 0;

        let loader = ConfigLoader::new()
            .with_base_config(base)
            .with_config_paths::<PathBuf>(vec![])
            .without_env_loading();
        assert!(loader.load().is_err());
        assert!(loader.with_validation(false).load().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_takes_precedence_over_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("mosque-admin.json");
        let mut file_config = AdminConfig::default();
        file_config.observability.log_level = "debug".to_string();
        file_config.to_file(&file, "json").unwrap();

        std::env::set_var("MOSQUE_ADMIN_LOG_LEVEL", "warn");
        let config = load_config_with_paths(vec![&file]);
        std::env::remove_var("MOSQUE_ADMIN_LOG_LEVEL");

        assert_eq!(config.unwrap().observability.log_level, "warn");
    }

    #[test]
    #[serial]
    fn test_load_config_from_env() {
        std::env::set_var("MOSQUE_ADMIN_MOSQUE_NAME", "Env Mosque");
        let config = load_config_from_env();
        std::env::remove_var("MOSQUE_ADMIN_MOSQUE_NAME");

        assert_eq!(
            config.unwrap().mosque.mosque_name.as_deref(),
            Some("Env Mosque")
        );
    }

    #[test]
    fn test_create_sample_config() {
        let temp_dir = TempDir::new().unwrap();
        let json_file = temp_dir.path().join("nested").join("sample.json");
        let yaml_file = temp_dir.path().join("sample.yaml");

        ConfigLoader::create_sample_config(&json_file, "json").unwrap();
        ConfigLoader::create_sample_config(&yaml_file, "yaml").unwrap();

        assert_eq!(
            AdminConfig::from_file(&json_file).unwrap(),
            AdminConfig::default()
        );
        assert!(yaml_file.exists());
    }
}
