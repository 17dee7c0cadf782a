use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend task status a timer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Path segment of the backend endpoint for this status.
    pub fn endpoint_segment(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "start",
            TaskStatus::Completed => "complete",
        }
    }
}

/// Id of a backend task the timer is working on. The timer only stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// `None` for blank input and for the `"none"` placeholder.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
