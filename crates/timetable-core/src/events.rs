use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{BreakKind, Phase, TaskId};

/// What happened to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
    SessionCompleted,
    BreakCompleted,
    TaskSelected,
}

/// Every state change of the timer produces an event.
/// Rendering, sounds and integrations subscribe to them; the core never
/// acts on its own events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerEvent {
    pub action: TimerAction,
    /// Phase after the change.
    pub phase: Phase,
    /// Set while the timer is in a break.
    pub break_kind: Option<BreakKind>,
    pub remaining_secs: u64,
    pub completed_sessions: u32,
    pub total_sessions: u32,
    pub task_id: Option<TaskId>,
    pub at: DateTime<Utc>,
}

/// A request to alert the user that a phase ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn focus_complete() -> Self {
        Self {
            title: "Session Complete!".into(),
            body: "Time for a break!".into(),
        }
    }

    pub fn break_complete() -> Self {
        Self {
            title: "Break Complete!".into(),
            body: "Time to focus again.".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Short-lived status message (the toast of a GUI front end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
