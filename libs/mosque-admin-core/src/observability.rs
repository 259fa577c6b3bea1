//! Structured logging setup
//!
//! The library itself only emits `tracing` events. Binaries embedding it call
//! [`init_tracing`] once at startup to install a subscriber.

use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log levels accepted in configuration
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for logging output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Enable JSON logging format
    pub json_logs: bool,

    /// Service name attached to the startup event
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "mosque-admin".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Parsed log level
    ///
    /// # Errors
    /// Returns a configuration error for an unknown level
    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse::<Level>()
            .map_err(|e| AdminError::configuration(format!("Invalid log level: {e}")))
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
/// Returns a configuration error for an invalid level, or when a global
/// subscriber is already installed
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    config.level()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        registry.with(json_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE);

        registry.with(fmt_layer).try_init()
    };

    installed
        .map_err(|e| AdminError::configuration(format!("Failed to initialize tracing: {e}")))?;

    info!(
        service = %config.service_name,
        "Tracing initialized with level: {}", config.log_level
    );
    Ok(())
}
