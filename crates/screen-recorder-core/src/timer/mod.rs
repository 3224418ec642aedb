//! Countdown for work intervals.
//!
//! Independent from the recording lifecycle. The owner calls [`WorkTimer::tick`]
//! once per [`TICK_INTERVAL`] and announces [`TimerTick::Elapsed`] to the user.

use std::time::Duration;

use tracing::{debug, info};

/// Default work interval: 25 minutes.
pub const DEFAULT_WORK_DURATION: Duration = Duration::from_secs(25 * 60);

/// How often [`WorkTimer::tick`] is expected to be called.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of a timer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Nothing changed.
    Unchanged,
    /// Counting down.
    Counting {
        /// Seconds left.
        remaining_secs: u64,
    },
    /// The countdown reached zero; tell the user.
    Elapsed,
}

/// Start/pause/reset countdown with one-second resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkTimer {
    duration_secs: u64,
    remaining_secs: u64,
    running: bool,
}

impl Default for WorkTimer {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_DURATION)
    }
}

impl WorkTimer {
    /// Creates a paused timer set to `duration`, truncated to whole seconds.
    pub fn new(duration: Duration) -> Self {
        let duration_secs = duration.as_secs();
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
        }
    }

    /// Seconds left.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Whether the countdown is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Resumes the countdown.
    ///
    /// Starting a timer that already hit zero announces [`TimerTick::Elapsed`]
    /// again instead of counting.
    pub fn start(&mut self) -> TimerTick {
        if self.running {
            return TimerTick::Unchanged;
        }
        self.running = true;
        info!(remaining = %self.display(), "Timer started");

        if self.remaining_secs == 0 {
            TimerTick::Elapsed
        } else {
            TimerTick::Counting {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Freezes the countdown.
    pub fn pause(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Unchanged;
        }
        self.running = false;
        info!(remaining = %self.display(), "Timer paused");
        TimerTick::Counting {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Restores the full interval and pauses.
    pub fn reset(&mut self) -> TimerTick {
        self.remaining_secs = self.duration_secs;
        self.running = false;
        info!(remaining = %self.display(), "Timer reset");
        TimerTick::Counting {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Advances one second.
    pub fn tick(&mut self) -> TimerTick {
        if !self.running || self.remaining_secs == 0 {
            return TimerTick::Unchanged;
        }

        self.remaining_secs -= 1;

        if self.remaining_secs == 0 {
            info!("Timer elapsed");
            TimerTick::Elapsed
        } else {
            debug!(remaining_secs = self.remaining_secs, "Timer tick");
            TimerTick::Counting {
                remaining_secs: self.remaining_secs,
            }
        }
    }
}

/// Formats seconds as zero-padded `MM:SS`. Minutes are not capped at 59.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
