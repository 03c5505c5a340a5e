//! User-facing notification seam
//!
//! Stores that have no caller to report to (the background timer poll in
//! particular) surface problems through an injected [`Notifier`] instead of
//! reaching into any particular UI framework.

use tracing::{error, info, warn};

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that forwards everything to `tracing` events
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(kind = "success", "{message}");
    }

    fn info(&self, message: &str) {
        info!(kind = "info", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(kind = "warning", "{message}");
    }

    fn error(&self, message: &str) {
        error!(kind = "error", "{message}");
    }
}

/// Notifier that discards everything
#[derive(Debug, Default, Clone)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
