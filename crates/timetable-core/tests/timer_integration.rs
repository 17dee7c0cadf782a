//! End-to-end timer scenarios: a controller backed by an on-disk store,
//! driven by its own tick source on a paused tokio clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use timetable_core::storage::settings::{load_settings, CURRENT_TASK_KEY, SETTINGS_KEY};
use timetable_core::{
    BreakKind, CoreError, Database, KeyValueStore, Notification, Phase, TaskApi, TaskId,
    TaskStatus, TimerAction, TimerController, TimerEvent, TimerObserver, TimerSettings,
};

/// Backend stand-in that records every request and always succeeds.
#[derive(Clone, Default)]
struct RecordingApi(Rc<RefCell<Vec<(String, TaskStatus)>>>);

impl TaskApi for RecordingApi {
    async fn update_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<bool, CoreError> {
        self.0.borrow_mut().push((task_id.to_string(), status));
        Ok(true)
    }
}

#[derive(Default)]
struct Journal {
    events: Vec<TimerEvent>,
    notifications: Vec<Notification>,
}

struct JournalObserver(Rc<RefCell<Journal>>);

impl TimerObserver for JournalObserver {
    fn on_event(&mut self, event: &TimerEvent) {
        self.0.borrow_mut().events.push(event.clone());
    }

    fn on_notification(&mut self, notification: &Notification) {
        self.0.borrow_mut().notifications.push(notification.clone());
    }
}

async fn run_phase<A: TaskApi, S: KeyValueStore>(c: &mut TimerController<A, S>) -> u32 {
    c.start().await.unwrap();
    let mut ticks = 0;
    while c.next_tick().await.unwrap().is_some() {
        ticks += 1;
    }
    ticks
}

#[tokio::test(start_paused = true)]
async fn three_sessions_then_long_break() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("timetable.db")).unwrap();
    let journal = Rc::new(RefCell::new(Journal::default()));
    let mut c = TimerController::new(RecordingApi::default(), db);
    c.subscribe(Box::new(JournalObserver(journal.clone())));

    let mut breaks = Vec::new();
    for _ in 0..3 {
        assert_eq!(run_phase(&mut c).await, 25 * 60);
        breaks.push(c.machine().break_kind().unwrap());
        assert_eq!(c.machine().phase(), Phase::Break);
        run_phase(&mut c).await;
        assert_eq!(c.machine().phase(), Phase::Focus);
    }
    assert_eq!(breaks, vec![BreakKind::Short, BreakKind::Short, BreakKind::Long]);
    assert_eq!(c.machine().completed_sessions(), 3);

    let journal = journal.borrow();
    assert_eq!(journal.notifications.len(), 6);
    assert_eq!(journal.notifications[0], Notification::focus_complete());
    assert_eq!(journal.notifications[1], Notification::break_complete());
    let long_break = journal
        .events
        .iter()
        .find(|e| e.action == TimerAction::SessionCompleted && e.completed_sessions == 3)
        .unwrap();
    assert_eq!(long_break.break_kind, Some(BreakKind::Long));
    assert_eq!(long_break.remaining_secs, 15 * 60);
}

#[tokio::test(start_paused = true)]
async fn tick_cadence_follows_the_period() {
    let db = Database::open_memory().unwrap();
    let mut c = TimerController::new(RecordingApi::default(), db)
        .with_tick_period(Duration::from_millis(100));
    c.set_focus_minutes(1).await.unwrap();

    let started = tokio::time::Instant::now();
    assert_eq!(run_phase(&mut c).await, 60);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(6));
    assert!(elapsed < Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn paused_timer_keeps_its_place() {
    let db = Database::open_memory().unwrap();
    let mut c = TimerController::new(RecordingApi::default(), db);
    c.start().await.unwrap();
    for _ in 0..10 {
        c.next_tick().await.unwrap().unwrap();
    }
    c.pause().await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(c.machine().remaining_secs(), 25 * 60 - 10);

    c.start().await.unwrap();
    let snap = c.next_tick().await.unwrap().unwrap();
    assert_eq!(snap.remaining_secs, 25 * 60 - 11);
    assert!(snap.is_running);
}

#[tokio::test(start_paused = true)]
async fn reset_mid_break_keeps_sessions() {
    let db = Database::open_memory().unwrap();
    let mut c = TimerController::new(RecordingApi::default(), db);
    c.set_focus_minutes(10).await.unwrap();
    run_phase(&mut c).await;

    c.start().await.unwrap();
    c.next_tick().await.unwrap();
    c.reset().await.unwrap();
    assert_eq!(c.machine().completed_sessions(), 1);
    assert_eq!(c.machine().phase(), Phase::Break);
    assert_eq!(c.machine().remaining_secs(), 2 * 60);
    assert!(!c.has_tick_source());
}

#[tokio::test(start_paused = true)]
async fn task_lifecycle_against_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timetable.db");
    let api = RecordingApi::default();

    {
        let mut c = TimerController::new(api.clone(), Database::open_at(&path).unwrap());
        c.select_task(TaskId::parse("12")).await.unwrap();
    }

    // A new session picks the task up from storage.
    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.kv_get(CURRENT_TASK_KEY).unwrap().as_deref(), Some("12"));
    let mut c = TimerController::new(api.clone(), db);
    assert_eq!(c.machine().task_id().map(TaskId::as_str), Some("12"));

    c.set_focus_minutes(1).await.unwrap();
    run_phase(&mut c).await; // focus 1
    run_phase(&mut c).await; // break
    run_phase(&mut c).await; // focus 2 of 2

    let calls = api.0.borrow();
    assert_eq!(
        calls.as_slice(),
        &[
            ("12".to_string(), TaskStatus::InProgress),
            ("12".to_string(), TaskStatus::InProgress),
            ("12".to_string(), TaskStatus::InProgress),
            ("12".to_string(), TaskStatus::Completed),
        ]
    );
    assert!(c.machine().task_id().is_none());
    assert!(c.store().kv_get(CURRENT_TASK_KEY).unwrap().is_none());
}

#[tokio::test]
async fn malformed_stored_settings_use_defaults() {
    let db = Database::open_memory().unwrap();
    db.kv_set(SETTINGS_KEY, r#"{"focusMinutes": "soon"}"#).unwrap();
    assert_eq!(load_settings(&db), TimerSettings::default());

    let c = TimerController::new(RecordingApi::default(), db);
    assert_eq!(c.machine().settings().focus_minutes, 25);
    assert_eq!(c.machine().remaining_secs(), 1500);
}

#[tokio::test]
async fn legacy_settings_blob_is_read() {
    let db = Database::open_memory().unwrap();
    db.kv_set(
        SETTINGS_KEY,
        r#"{"pomodoroMinutes":50,"shortBreakMinutes":10,"longBreakMinutes":30,"totalSessions":4}"#,
    )
    .unwrap();
    let c = TimerController::new(RecordingApi::default(), db);
    let snap = c.snapshot();
    assert_eq!(snap.settings, TimerSettings::from_focus(50));
    assert_eq!(snap.total_sessions, 4);
}
