//! Session planning.
//!
//! Every duration the timer uses is derived from one user setting, the focus
//! length. Breaks follow a 5:1:3 ratio (focus : short break : long break) and
//! the number of sessions before a long break grows by one per 25 focus
//! minutes.

use serde::Serialize;

/// Focus length used when nothing valid has been configured.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

const MIN_SHORT_BREAK_MIN: u32 = 1;
const MIN_LONG_BREAK_MIN: u32 = 3;
const MIN_SESSIONS: u32 = 2;
const MAX_SESSIONS: u32 = 6;

/// Durations derived from a focus length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSchedule {
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Completed focus sessions between long breaks.
    pub total_sessions: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPlanner;

impl SessionPlanner {
    /// Derive the break schedule for `focus_minutes`.
    ///
    /// Non-positive input is treated as one minute. Rounding is half-up,
    /// done in integer arithmetic so results are exact.
    pub fn derive(focus_minutes: i64) -> DerivedSchedule {
        let m = clamp_focus(focus_minutes) as u64;

        // round(m / 5), round(m * 3 / 5), round(m / 25)
        let short = ((2 * m + 5) / 10) as u32;
        let long = ((6 * m + 5) / 10) as u32;
        let per_25 = ((2 * m + 25) / 50) as u32;

        DerivedSchedule {
            short_break_minutes: short.max(MIN_SHORT_BREAK_MIN),
            long_break_minutes: long.max(MIN_LONG_BREAK_MIN),
            total_sessions: per_25.saturating_add(2).clamp(MIN_SESSIONS, MAX_SESSIONS),
        }
    }
}

/// Coerce any integer into a usable focus length (at least one minute).
pub fn clamp_focus(focus_minutes: i64) -> u32 {
    focus_minutes.clamp(1, u32::MAX as i64) as u32
}
