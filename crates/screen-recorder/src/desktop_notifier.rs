//! Desktop toasts for recorder and timer notifications.

use screen_recorder_core::{Notification, NotificationSink, TracingSink};

use notify_rust::{Notification as Toast, Timeout};
use tokio::runtime::Handle;
use tracing::{debug, warn};

const APP_NAME: &str = "Screen Recorder";

/// [`NotificationSink`] that logs every notification and, when enabled,
/// shows it as a desktop toast.
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    log: TracingSink,
    desktop: bool,
}

impl DesktopNotifier {
    /// Creates a notifier. With `desktop` off, notifications are only logged.
    pub fn new(desktop: bool) -> Self {
        Self {
            log: TracingSink,
            desktop,
        }
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, notification: Notification) {
        self.log.notify(notification.clone());

        if !self.desktop {
            return;
        }

        let toast = toast_for(&notification);

        // Some notification servers answer synchronously over D-Bus.
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || show(toast));
            }
            Err(_) => show(toast),
        }
    }
}

/// Builds the toast for a notification.
pub(crate) fn toast_for(notification: &Notification) -> Toast {
    let mut toast = Toast::new();
    toast
        .appname(APP_NAME)
        .summary(notification.title())
        .timeout(toast_timeout(notification));

    if let Some(body) = notification.body() {
        toast.body(&body);
    }

    toast
}

/// Errors stay on screen until dismissed.
pub(crate) fn toast_timeout(notification: &Notification) -> Timeout {
    match notification.display_duration() {
        Some(duration) => {
            Timeout::Milliseconds(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX))
        }
        None => Timeout::Never,
    }
}

fn show(toast: Toast) {
    match toast.show() {
        Ok(_) => debug!(summary = %toast.summary, "Toast shown"),
        Err(e) => warn!(error = %e, "Failed to show desktop notification"),
    }
}
