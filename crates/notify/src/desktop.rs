//! freedesktop.org notifications via `notify-rust`.

use crate::{Notification, Notifier, NotifyError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Application name shown by the notification daemon.
pub const APP_NAME: &str = "spotify-mute";

const ICON: &str = "dialog-information";

type ShowFn = fn(&Notification) -> Result<(), NotifyError>;

/// Shows notifications on the desktop.
///
/// The D-Bus call runs on a blocking task so the caller never waits for the
/// notification daemon.
#[derive(Clone, Copy)]
pub struct DesktopNotifier {
    show: ShowFn,
}

impl std::fmt::Debug for DesktopNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopNotifier").finish_non_exhaustive()
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self { show: show_popup }
    }
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the popup on the blocking pool. `None` outside a tokio runtime.
    fn dispatch(&self, notification: &Notification) -> Option<JoinHandle<()>> {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("{}", NotifyError::NoRuntime);
            return None;
        };

        let show = self.show;
        let notification = notification.clone();
        Some(handle.spawn_blocking(move || {
            if let Err(e) = show(&notification) {
                tracing::warn!("{}", e);
            } else {
                tracing::debug!(summary = %notification.summary, "notification shown");
            }
        }))
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) {
        self.dispatch(notification);
    }
}

fn show_popup(notification: &Notification) -> Result<(), NotifyError> {
    let timeout_ms = u32::try_from(notification.timeout.as_millis()).unwrap_or(u32::MAX);

    notify_rust::Notification::new()
        .appname(APP_NAME)
        .icon(ICON)
        .summary(&notification.summary)
        .body(&notification.body)
        .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
        .show()
        .map(|_| ())
        .map_err(|e| NotifyError::Show(e.to_string()))
}
