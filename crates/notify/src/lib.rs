//! Desktop notifications.
//!
//! Notifying is best effort: a failed popup must never get in the way of
//! muting, so [`Notifier::notify`] has no error to return. Backends log
//! their failures instead.

mod desktop;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use desktop::{DesktopNotifier, APP_NAME};

/// A popup to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub summary: String,
    pub body: String,
    pub timeout: Duration,
}

impl Notification {
    pub fn new(summary: impl Into<String>, body: impl Into<String>, timeout: Duration) -> Self {
        Self {
            summary: summary.into(),
            body: body.into(),
            timeout,
        }
    }

    /// Popup shown when an advertisement gets muted.
    pub fn ad_muted() -> Self {
        Self::new(
            "Sound muted",
            "Advertisement detected, sound is now muted",
            Duration::from_millis(2000),
        )
    }
}

/// Errors a notification backend may hit. Logged, never propagated.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to show notification: {0}")]
    Show(String),

    #[error("no async runtime available to show notification")]
    NoRuntime,
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    /// Show `notification`. Must return promptly and never fail.
    fn notify(&self, notification: &Notification);
}

/// Type alias for shared notifier reference.
pub type NotifierRef = Arc<dyn Notifier>;

/// In-memory notifier for testing.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().unwrap().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }
}

/// Notifier that discards everything.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) {}
}
