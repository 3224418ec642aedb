use crate::{DEFAULT_WORK_DURATION, TimerTick, WorkTimer, format_clock};

use std::time::Duration;

/// WHAT: A fresh timer shows the full interval and is paused
/// WHY: The clock label is rendered before the user touches the timer
#[test]
fn given_default_timer_when_created_then_paused_at_twenty_five_minutes() {
    // Given / When: A default timer
    let timer = WorkTimer::default();

    // Then: Full interval, not running
    assert_eq!(timer.remaining_secs(), DEFAULT_WORK_DURATION.as_secs());
    assert_eq!(timer.display(), "25:00");
    assert!(!timer.is_running());
}

/// WHAT: Ticks are ignored while paused
/// WHY: Pause must freeze the countdown
#[test]
fn given_paused_timer_when_ticking_then_unchanged() {
    // Given: A timer that was started then paused
    let mut timer = WorkTimer::new(Duration::from_secs(10));
    timer.start();
    timer.tick();
    assert_eq!(timer.pause(), TimerTick::Counting { remaining_secs: 9 });

    // When: Ticking
    let tick = timer.tick();

    // Then: Nothing moves
    assert_eq!(tick, TimerTick::Unchanged);
    assert_eq!(timer.remaining_secs(), 9);
}

/// WHAT: Elapsed is reported exactly once
/// WHY: The user gets one "time's up" notification per interval
#[test]
fn given_running_timer_when_reaching_zero_then_elapsed_once() {
    // Given: A three-second running timer
    let mut timer = WorkTimer::new(Duration::from_secs(3));
    assert_eq!(timer.start(), TimerTick::Counting { remaining_secs: 3 });

    // When: Ticking past zero
    let ticks: Vec<_> = (0..5).map(|_| timer.tick()).collect();

    // Then: Two counts, one elapsed, then nothing
    assert_eq!(
        ticks,
        vec![
            TimerTick::Counting { remaining_secs: 2 },
            TimerTick::Counting { remaining_secs: 1 },
            TimerTick::Elapsed,
            TimerTick::Unchanged,
            TimerTick::Unchanged,
        ]
    );
    assert_eq!(timer.display(), "00:00");
}

/// WHAT: Starting an expired timer announces Elapsed again
/// WHY: Pressing start at 00:00 must not silently do nothing
#[test]
fn given_expired_timer_when_started_again_then_elapsed_reannounced() {
    // Given: A timer that already ran out and was paused
    let mut timer = WorkTimer::new(Duration::from_secs(1));
    timer.start();
    assert_eq!(timer.tick(), TimerTick::Elapsed);
    timer.pause();

    // When: Starting again
    let tick = timer.start();

    // Then: Elapsed, remaining stays zero
    assert_eq!(tick, TimerTick::Elapsed);
    assert_eq!(timer.remaining_secs(), 0);
}

/// WHAT: Reset restores the interval and pauses
/// WHY: Reset is the only way back to a full interval
#[test]
fn given_running_timer_when_reset_then_full_interval_and_paused() {
    // Given: A running timer part way through
    let mut timer = WorkTimer::new(Duration::from_secs(61));
    timer.start();
    timer.tick();

    // When: Resetting
    let tick = timer.reset();

    // Then: Back to 01:01, paused
    assert_eq!(tick, TimerTick::Counting { remaining_secs: 61 });
    assert_eq!(timer.display(), "01:01");
    assert!(!timer.is_running());
}

/// WHAT: Starting twice is a no-op
/// WHY: Repeated menu clicks must not reset state
#[test]
fn given_running_timer_when_started_again_then_unchanged() {
    // Given: A running timer
    let mut timer = WorkTimer::new(Duration::from_secs(5));
    timer.start();

    // When / Then: Second start does nothing
    assert_eq!(timer.start(), TimerTick::Unchanged);
    assert!(timer.is_running());
}

/// WHAT: Clock formatting pads and does not cap minutes
/// WHY: Custom intervals may exceed an hour
#[test]
fn given_seconds_when_formatting_then_zero_padded_minutes_and_seconds() {
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(59), "00:59");
    assert_eq!(format_clock(61), "01:01");
    assert_eq!(format_clock(25 * 60), "25:00");
    assert_eq!(format_clock(100 * 60), "100:00");
}
