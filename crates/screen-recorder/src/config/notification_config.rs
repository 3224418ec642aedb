use crate::config::default_desktop_notifications;

use serde::{Deserialize, Serialize};

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Show desktop toasts. Notifications are always logged.
    #[serde(default = "default_desktop_notifications")]
    pub desktop: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            desktop: default_desktop_notifications(),
        }
    }
}
