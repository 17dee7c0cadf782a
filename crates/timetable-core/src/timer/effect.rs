//! Side-effect requests produced by the state machine.
//!
//! The machine decides *what* should happen outside of it; the controller
//! decides *how*. Keeping the two apart lets every transition be tested
//! without a runtime, a network or a disk.

use crate::events::{Notification, TimerEvent};

use super::settings::TimerSettings;
use super::task::{TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver an event to observers.
    Emit(TimerEvent),
    /// Alert the user that a phase finished.
    Notify(Notification),
    /// Report task progress to the backend.
    UpdateTask { task_id: TaskId, status: TaskStatus },
    /// Write the timer settings to durable storage.
    PersistSettings(TimerSettings),
    /// Write (or remove, on `None`) the selected task.
    PersistTask(Option<TaskId>),
}

impl Effect {
    pub fn type_name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "Emit",
            Effect::Notify(_) => "Notify",
            Effect::UpdateTask { .. } => "UpdateTask",
            Effect::PersistSettings(_) => "PersistSettings",
            Effect::PersistTask(_) => "PersistTask",
        }
    }
}
