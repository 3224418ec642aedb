use crate::config::default_work_minutes;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Work timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Length of one work interval in minutes.
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
        }
    }
}

impl TimerConfig {
    /// Work interval as a duration. Zero falls back to the default.
    pub fn work_duration(&self) -> Duration {
        let minutes = match self.work_minutes {
            0 => default_work_minutes(),
            m => m,
        };
        Duration::from_secs(minutes.saturating_mul(60))
    }
}
