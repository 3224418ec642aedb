//! User-facing notifications for session transitions and the work timer.

use std::{fmt, time::Duration};

use tracing::{info, warn};

/// How long transient session toasts stay on screen.
pub const SESSION_TOAST_DURATION: Duration = Duration::from_millis(2000);

/// How long the timer's completion toast stays on screen.
pub const TIMER_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Capture began.
    RecordingStarted,
    /// Capture ended.
    RecordingStopped,
    /// The capture device could not be acquired.
    AccessFailed {
        /// Underlying cause.
        cause: String,
    },
    /// Download requested with nothing recorded.
    NoArtifactAvailable,
    /// A download was handed to the download surface.
    DownloadStarted,
    /// The work timer reached zero.
    TimeUp,
}

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation.
    Success,
    /// Informational.
    Info,
    /// Something went wrong.
    Error,
}

impl Notification {
    /// Short headline.
    pub fn title(&self) -> &'static str {
        match self {
            Notification::RecordingStarted => "Recording Started",
            Notification::RecordingStopped => "Recording Stopped",
            Notification::AccessFailed { .. } => "Oops...",
            Notification::NoArtifactAvailable => "No recorded video available",
            Notification::DownloadStarted => "Start Downloading!",
            Notification::TimeUp => "Time is up! Take a break.",
        }
    }

    /// Optional body text.
    pub fn body(&self) -> Option<String> {
        match self {
            Notification::AccessFailed { cause } => {
                Some(format!("Failed to access the screen! {}", cause))
            }
            _ => None,
        }
    }

    /// Visual weight.
    pub fn severity(&self) -> Severity {
        match self {
            Notification::AccessFailed { .. } | Notification::NoArtifactAvailable => {
                Severity::Error
            }
            Notification::TimeUp => Severity::Info,
            _ => Severity::Success,
        }
    }

    /// How long the notification should stay visible. `None` means until
    /// dismissed.
    pub fn display_duration(&self) -> Option<Duration> {
        match self {
            Notification::AccessFailed { .. } => None,
            Notification::TimeUp => Some(TIMER_TOAST_DURATION),
            _ => Some(SESSION_TOAST_DURATION),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.body() {
            Some(body) => write!(f, "{}: {}", self.title(), body),
            None => write!(f, "{}", self.title()),
        }
    }
}

/// Fire-and-forget side channel to the user.
///
/// Implementations must not block and must not fail loudly: a notification
/// that cannot be shown is logged and dropped.
pub trait NotificationSink: Send + Sync {
    /// Surfaces `notification`.
    fn notify(&self, notification: Notification);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity() {
            Severity::Error => warn!(notification = %notification, "Notification"),
            _ => info!(notification = %notification, "Notification"),
        }
    }
}
