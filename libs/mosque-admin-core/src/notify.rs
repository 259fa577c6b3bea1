//! User-visible notifications
//!
//! Notifications are fire-and-forget: they are never awaited and never
//! affect the outcome of the query or mutation that raised them.

use std::sync::Arc;
use tracing::{info, warn};

/// Sink for success and error toasts
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Shared handle to a notifier
pub type SharedNotifier = Arc<dyn Notifier>;

/// Emits notifications as tracing events under the `notification` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "notification", kind = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        warn!(target: "notification", kind = "error", "{}", message);
    }
}
