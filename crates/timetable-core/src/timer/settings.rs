use serde::{Deserialize, Serialize};
use tracing::warn;

use super::planner::{clamp_focus, DerivedSchedule, SessionPlanner, DEFAULT_FOCUS_MINUTES};

/// User-facing timer configuration: the focus length plus everything
/// derived from it.
///
/// Serialized as `{focusMinutes, shortBreakMinutes, longBreakMinutes,
/// totalSessions}`. Deserializing reads only the focus length and
/// re-derives the schedule, so stored break values are never trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettings")]
pub struct TimerSettings {
    pub focus_minutes: u32,
    #[serde(flatten)]
    pub schedule: DerivedSchedule,
}

/// Only the focus length is read back; the rest is re-derived.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default, alias = "pomodoroMinutes")]
    focus_minutes: Option<i64>,
}

impl From<StoredSettings> for TimerSettings {
    fn from(stored: StoredSettings) -> Self {
        match stored.focus_minutes {
            Some(m) if m > 0 => Self::from_focus(m),
            _ => Self::default(),
        }
    }
}

impl TimerSettings {
    /// Settings for `focus_minutes`, clamped to at least one minute.
    pub fn from_focus(focus_minutes: i64) -> Self {
        Self {
            focus_minutes: clamp_focus(focus_minutes),
            schedule: SessionPlanner::derive(focus_minutes),
        }
    }

    /// Parse a persisted settings blob, falling back to defaults when it is
    /// malformed or carries no usable focus length.
    pub fn from_stored(json: &str) -> Self {
        Self::from_stored_or(json, Self::default())
    }

    /// Like [`from_stored`](Self::from_stored) with an explicit fallback.
    pub fn from_stored_or(json: &str, fallback: Self) -> Self {
        match serde_json::from_str::<StoredSettings>(json) {
            Ok(StoredSettings {
                focus_minutes: Some(m),
            }) if m > 0 => Self::from_focus(m),
            Ok(_) => fallback,
            Err(e) => {
                warn!(error = %e, "ignoring malformed timer settings");
                fallback
            }
        }
    }

    pub fn focus_secs(&self) -> u64 {
        u64::from(self.focus_minutes) * 60
    }

    pub fn short_break_secs(&self) -> u64 {
        u64::from(self.schedule.short_break_minutes) * 60
    }

    pub fn long_break_secs(&self) -> u64 {
        u64::from(self.schedule.long_break_minutes) * 60
    }

    pub fn total_sessions(&self) -> u32 {
        self.schedule.total_sessions
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::from_focus(i64::from(DEFAULT_FOCUS_MINUTES))
    }
}
