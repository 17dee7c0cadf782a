//! Focus/break state machine.
//!
//! Composes a [`TimerClock`] with the schedule from [`TimerSettings`].
//! Commands return the [`Effect`]s the caller must carry out; the machine
//! itself does no I/O.
//!
//! ## State Transitions
//!
//! ```text
//! Focus --(0s)--> Break(short|long) --(0s)--> Focus
//! ```
//!
//! The clock stops at every phase boundary; `start()` begins the next one.
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = TimerStateMachine::new(TimerSettings::default());
//! machine.start();
//! // once per second:
//! let effects = machine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::TimerClock;
use super::effect::Effect;
use super::settings::TimerSettings;
use super::task::{TaskId, TaskStatus};
use crate::events::{Notification, TimerAction, TimerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

/// Point-in-time view of the timer for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub break_kind: Option<BreakKind>,
    pub is_running: bool,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress: f64,
    pub completed_sessions: u32,
    pub total_sessions: u32,
    pub task_id: Option<TaskId>,
    pub settings: TimerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStateMachine {
    settings: TimerSettings,
    clock: TimerClock,
    phase: Phase,
    /// Chosen when a break begins, cleared when it ends.
    break_kind: Option<BreakKind>,
    completed_sessions: u32,
    task_id: Option<TaskId>,
}

impl TimerStateMachine {
    /// A stopped timer at the start of a focus session.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            clock: TimerClock::new(settings.focus_secs()),
            settings,
            phase: Phase::Focus,
            break_kind: None,
            completed_sessions: 0,
            task_id: None,
        }
    }

    /// Attach a previously selected task without emitting anything.
    pub fn with_task(mut self, task_id: Option<TaskId>) -> Self {
        self.task_id = task_id;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn break_kind(&self) -> Option<BreakKind> {
        self.break_kind
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_secs()
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            break_kind: self.break_kind,
            is_running: self.clock.is_running(),
            remaining_secs: self.clock.remaining_secs(),
            total_secs: self.clock.total_secs(),
            progress: self.clock.progress(),
            completed_sessions: self.completed_sessions,
            total_sessions: self.settings.total_sessions(),
            task_id: self.task_id.clone(),
            settings: self.settings,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. No-op while running.
    pub fn start(&mut self) -> Vec<Effect> {
        if !self.clock.start() {
            return Vec::new();
        }
        let mut effects = Vec::with_capacity(2);
        if let Some(task_id) = &self.task_id {
            effects.push(Effect::UpdateTask {
                task_id: task_id.clone(),
                status: TaskStatus::InProgress,
            });
        }
        effects.push(self.emit(TimerAction::Start));
        effects
    }

    /// Stop the countdown, keeping the remaining time. No-op while stopped.
    pub fn pause(&mut self) -> Vec<Effect> {
        if !self.clock.pause() {
            return Vec::new();
        }
        vec![self.emit(TimerAction::Pause)]
    }

    /// Stop and reload the current phase. Completed sessions are kept.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.clock.reset(self.phase_secs());
        vec![self.emit(TimerAction::Reset)]
    }

    /// One elapsed second. Finishing a phase moves to the next one.
    pub fn tick(&mut self) -> Vec<Effect> {
        match self.clock.tick() {
            Some(t) if t.finished => self.complete_phase(),
            _ => Vec::new(),
        }
    }

    /// Change the focus length, re-derive the schedule and reset the
    /// current phase with the new durations.
    pub fn set_focus_minutes(&mut self, focus_minutes: i64) -> Vec<Effect> {
        self.settings = TimerSettings::from_focus(focus_minutes);
        debug!(
            focus = self.settings.focus_minutes,
            short = self.settings.schedule.short_break_minutes,
            long = self.settings.schedule.long_break_minutes,
            sessions = self.settings.schedule.total_sessions,
            "derived timer schedule"
        );
        let mut effects = vec![Effect::PersistSettings(self.settings)];
        effects.extend(self.reset());
        effects
    }

    pub fn select_task(&mut self, task_id: Option<TaskId>) -> Vec<Effect> {
        self.task_id = task_id;
        vec![
            Effect::PersistTask(self.task_id.clone()),
            self.emit(TimerAction::TaskSelected),
        ]
    }

    /// Forget the task once the backend has marked it complete.
    pub fn clear_task(&mut self) -> Vec<Effect> {
        if self.task_id.take().is_none() {
            return Vec::new();
        }
        vec![Effect::PersistTask(None)]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Focus => {
                self.completed_sessions = self.completed_sessions.saturating_add(1);
                let total = self.settings.total_sessions().max(1);
                let kind = if self.completed_sessions > 0 && self.completed_sessions % total == 0 {
                    BreakKind::Long
                } else {
                    BreakKind::Short
                };
                info!(
                    completed = self.completed_sessions,
                    total,
                    ?kind,
                    "focus session complete"
                );
                self.phase = Phase::Break;
                self.break_kind = Some(kind);
                self.clock.reset(self.phase_secs());

                let mut effects = vec![Effect::Notify(Notification::focus_complete())];
                if self.completed_sessions == total {
                    if let Some(task_id) = &self.task_id {
                        effects.push(Effect::UpdateTask {
                            task_id: task_id.clone(),
                            status: TaskStatus::Completed,
                        });
                    }
                }
                effects.push(self.emit(TimerAction::SessionCompleted));
                effects
            }
            Phase::Break => {
                info!(completed = self.completed_sessions, "break complete");
                self.phase = Phase::Focus;
                self.break_kind = None;
                self.clock.reset(self.phase_secs());
                vec![
                    Effect::Notify(Notification::break_complete()),
                    self.emit(TimerAction::BreakCompleted),
                ]
            }
        }
    }

    fn phase_secs(&self) -> u64 {
        match (self.phase, self.break_kind) {
            (Phase::Focus, _) => self.settings.focus_secs(),
            (Phase::Break, Some(BreakKind::Long)) => self.settings.long_break_secs(),
            (Phase::Break, _) => self.settings.short_break_secs(),
        }
    }

    fn emit(&self, action: TimerAction) -> Effect {
        Effect::Emit(TimerEvent {
            action,
            phase: self.phase,
            break_kind: self.break_kind,
            remaining_secs: self.clock.remaining_secs(),
            completed_sessions: self.completed_sessions,
            total_sessions: self.settings.total_sessions(),
            task_id: self.task_id.clone(),
            at: Utc::now(),
        })
    }
}

impl Default for TimerStateMachine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
