//! Session controller.
//!
//! A [`TimerController`] owns one timer session: the state machine, the
//! (at most one) active [`TickSource`], and the collaborators that carry out
//! the machine's [`Effect`]s. It is constructed once per session and never
//! shared between threads.
//!
//! The tick source exists exactly while the machine is running. It is
//! created by `start()` and released by `pause()`, `reset()`, a focus
//! change, the end of a phase, or dropping the controller.
//!
//! Every command is cancel-safe. The machine's state change and the effects
//! it requests are recorded before the first `.await`; effects leave the
//! pending queue only once they have run. If a command future is dropped
//! mid-effect (for example by `tokio::select!`), the unfinished effects run
//! at the start of the next command or [`TimerController::next_tick`]. An
//! interrupted task update is sent again.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::events::{Notice, Notification, TimerEvent};
use crate::integrations::{TaskApi, TimerObserver};
use crate::storage::settings::{load_settings_or, load_task, save_settings, save_task};
use crate::storage::KeyValueStore;
use crate::timer::{Effect, TaskId, TaskStatus, Tick, TickSource, TimerSettings, TimerSnapshot, TimerStateMachine};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct TimerController<A, S> {
    machine: TimerStateMachine,
    task_api: A,
    store: S,
    observers: Vec<Box<dyn TimerObserver>>,
    period: Duration,
    notifications_enabled: bool,
    ticks_tx: mpsc::UnboundedSender<Tick>,
    ticks_rx: mpsc::UnboundedReceiver<Tick>,
    ticker: Option<TickSource>,
    generation: u64,
    pending: VecDeque<Effect>,
}

impl<A: TaskApi, S: KeyValueStore> TimerController<A, S> {
    /// Rehydrate a session from `store`: persisted settings (or defaults)
    /// and the previously selected task.
    pub fn new(task_api: A, store: S) -> Self {
        Self::with_fallback(task_api, store, TimerSettings::default())
    }

    /// Like [`new`](Self::new), using `fallback` when nothing usable is stored.
    pub fn with_fallback(task_api: A, store: S, fallback: TimerSettings) -> Self {
        let settings = load_settings_or(&store, fallback);
        let task_id = load_task(&store).unwrap_or_else(|e| {
            warn!(error = %e, "could not read selected task");
            None
        });
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        Self {
            machine: TimerStateMachine::new(settings).with_task(task_id),
            task_api,
            store,
            observers: Vec::new(),
            period: DEFAULT_TICK_PERIOD,
            notifications_enabled: true,
            ticks_tx,
            ticks_rx,
            ticker: None,
            generation: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn TimerObserver>) {
        self.observers.push(observer);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn machine(&self) -> &TimerStateMachine {
        &self.machine
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.machine.snapshot()
    }

    /// Whether a tick source is currently registered.
    pub fn has_tick_source(&self) -> bool {
        self.ticker.is_some()
    }

    /// Generation of the active tick source, if any.
    pub fn tick_generation(&self) -> Option<u64> {
        self.ticker.as_ref().map(TickSource::generation)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Effects recorded but not yet carried out.
    pub fn pending_effects(&self) -> usize {
        self.pending.len()
    }

    // ── Commands ─────────────────────────────────────────────────────
    //
    // State changes are applied before any collaborator runs. An `Err`
    // reports a failed collaborator (task backend, storage); the timer
    // state is already updated and is never rolled back.

    /// Start or resume. A running timer is left untouched.
    pub async fn start(&mut self) -> Result<()> {
        let effects = self.machine.start();
        self.apply(effects).await
    }

    pub async fn pause(&mut self) -> Result<()> {
        let effects = self.machine.pause();
        self.apply(effects).await
    }

    pub async fn reset(&mut self) -> Result<()> {
        let effects = self.machine.reset();
        self.apply(effects).await
    }

    pub async fn set_focus_minutes(&mut self, focus_minutes: i64) -> Result<()> {
        let effects = self.machine.set_focus_minutes(focus_minutes);
        self.apply(effects).await
    }

    pub async fn select_task(&mut self, task_id: Option<TaskId>) -> Result<()> {
        let effects = self.machine.select_task(task_id);
        self.apply(effects).await
    }

    /// Wait for the next tick and apply it.
    ///
    /// Returns `Ok(None)` immediately when no tick source is active, so a
    /// paused or finished timer never blocks its caller. Effects left over
    /// from a cancelled call run first.
    pub async fn next_tick(&mut self) -> Result<Option<TimerSnapshot>> {
        if !self.pending.is_empty() {
            self.apply(Vec::new()).await?;
        }
        loop {
            let Some(active) = self.tick_generation() else {
                return Ok(None);
            };
            let Some(tick) = self.ticks_rx.recv().await else {
                return Ok(None);
            };
            if tick.generation != active {
                debug!(stale = tick.generation, active, "dropping tick from released source");
                continue;
            }
            let effects = self.machine.tick();
            self.apply(effects).await?;
            return Ok(Some(self.machine.snapshot()));
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Keep exactly one tick source while running and none otherwise, then
    /// queue `effects` behind any left over and carry them out in order.
    /// Every effect runs even if an earlier one failed; the first failure is
    /// returned.
    async fn apply(&mut self, effects: Vec<Effect>) -> Result<()> {
        self.sync_tick_source();
        self.pending.extend(effects);

        let mut first_err: Option<CoreError> = None;
        while let Some(effect) = self.pending.front().cloned() {
            debug!(effect = effect.type_name(), "applying effect");
            let outcome = match effect {
                Effect::UpdateTask { task_id, status } => self.update_task(task_id, status).await,
                other => self.apply_local(other),
            };
            self.pending.pop_front();
            if let Err(e) = outcome {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn apply_local(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::Emit(event) => {
                self.emit(&event);
                Ok(())
            }
            Effect::Notify(notification) => {
                self.notify(&notification);
                Ok(())
            }
            Effect::PersistSettings(settings) => save_settings(&self.store, &settings)
                .inspect_err(|e| warn!(error = %e, "failed to persist timer settings")),
            Effect::PersistTask(task_id) => save_task(&self.store, task_id.as_ref())
                .inspect_err(|e| warn!(error = %e, "failed to persist selected task")),
            Effect::UpdateTask { .. } => Err(CoreError::Custom(
                "task updates must go through the task API".into(),
            )),
        }
    }

    async fn update_task(&mut self, task_id: TaskId, status: TaskStatus) -> Result<()> {
        let outcome = self.task_api.update_status(&task_id, status).await;
        match outcome {
            Ok(true) => {
                let message = match status {
                    TaskStatus::Completed => "Task completed successfully!",
                    TaskStatus::InProgress => "Task started",
                };
                self.notice(&Notice::success(message));
                if status == TaskStatus::Completed {
                    let mut result = Ok(());
                    for effect in self.machine.clear_task() {
                        if let Err(e) = self.apply_local(effect) {
                            result = Err(e);
                        }
                    }
                    return result;
                }
                Ok(())
            }
            Ok(false) => {
                warn!(task = %task_id, ?status, "task backend declined the status update");
                Ok(())
            }
            Err(e) => {
                warn!(task = %task_id, ?status, error = %e, "error updating task status");
                self.notice(&Notice::error("Error updating task"));
                Err(e)
            }
        }
    }

    fn sync_tick_source(&mut self) {
        match (self.machine.is_running(), self.ticker.is_some()) {
            (true, false) => {
                self.generation += 1;
                self.ticker = Some(TickSource::spawn(
                    self.generation,
                    self.period,
                    self.ticks_tx.clone(),
                ));
            }
            (false, true) => {
                self.ticker = None;
            }
            _ => {}
        }
    }

    fn emit(&mut self, event: &TimerEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }

    fn notify(&mut self, notification: &Notification) {
        if !self.notifications_enabled {
            return;
        }
        for observer in &mut self.observers {
            observer.on_notification(notification);
        }
    }

    fn notice(&mut self, notice: &Notice) {
        for observer in &mut self.observers {
            observer.on_notice(notice);
        }
    }
}
