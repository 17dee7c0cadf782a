//! Countdown clock.
//!
//! The clock counts whole seconds and knows nothing about phases. It does
//! not own a time source either: each call to [`TimerClock::tick`] stands for
//! one elapsed second, delivered by whoever drives it.

use serde::{Deserialize, Serialize};

/// Result of one clock step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockTick {
    pub remaining_secs: u64,
    /// 0.0 .. 1.0 progress through the loaded duration.
    pub progress: f64,
    /// True when this tick brought the clock to zero.
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerClock {
    total_secs: u64,
    remaining_secs: u64,
    running: bool,
}

impl TimerClock {
    /// A stopped clock loaded with `total_secs`.
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// `(total - remaining) / total`, or 0.0 for an empty clock.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
    }

    /// Returns `true` if the clock was stopped and is now running.
    ///
    /// A clock with nothing left stays stopped until it is reset.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns `true` if the clock was running and is now stopped.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stop and reload with a new duration.
    pub fn reset(&mut self, to_secs: u64) {
        self.running = false;
        self.total_secs = to_secs;
        self.remaining_secs = to_secs;
    }

    /// Advance by one second. `None` when stopped.
    ///
    /// Reaching zero stops the clock; no further ticks are produced until
    /// [`reset`](Self::reset).
    pub fn tick(&mut self) -> Option<ClockTick> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let finished = self.remaining_secs == 0;
        if finished {
            self.running = false;
        }
        Some(ClockTick {
            remaining_secs: self.remaining_secs,
            progress: self.progress(),
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut clock = TimerClock::new(60);
        assert!(clock.start());
        assert!(!clock.start());
        assert!(clock.is_running());

        assert!(clock.pause());
        assert!(!clock.pause());
        assert!(!clock.is_running());
    }

    #[test]
    fn stopped_clock_does_not_tick() {
        let mut clock = TimerClock::new(60);
        assert!(clock.tick().is_none());
        assert_eq!(clock.remaining_secs(), 60);
    }

    #[test]
    fn tick_reports_progress() {
        let mut clock = TimerClock::new(4);
        clock.start();
        let t = clock.tick().unwrap();
        assert_eq!(t.remaining_secs, 3);
        assert!((t.progress - 0.25).abs() < f64::EPSILON);
        assert!(!t.finished);
    }

    #[test]
    fn stops_itself_at_zero() {
        let mut clock = TimerClock::new(2);
        clock.start();
        assert!(!clock.tick().unwrap().finished);
        let last = clock.tick().unwrap();
        assert!(last.finished);
        assert_eq!(last.remaining_secs, 0);
        assert!((last.progress - 1.0).abs() < f64::EPSILON);

        assert!(!clock.is_running());
        assert!(clock.tick().is_none());
        assert!(!clock.start(), "an exhausted clock must be reset first");
    }

    #[test]
    fn reset_stops_and_reloads() {
        let mut clock = TimerClock::new(10);
        clock.start();
        clock.tick();
        clock.reset(30);
        assert!(!clock.is_running());
        assert_eq!(clock.remaining_secs(), 30);
        assert_eq!(clock.total_secs(), 30);
        assert_eq!(clock.progress(), 0.0);
    }

    #[test]
    fn empty_clock_progress_is_zero() {
        assert_eq!(TimerClock::new(0).progress(), 0.0);
    }
}
