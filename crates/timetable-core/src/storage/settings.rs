//! Persistence of timer settings and the selected task.
//!
//! Only the configuration is stored, never the live countdown.

use tracing::warn;

use super::KeyValueStore;
use crate::error::Result;
use crate::timer::{TaskId, TimerSettings};

pub const SETTINGS_KEY: &str = "pomodoroSettings";
pub const CURRENT_TASK_KEY: &str = "currentPomodoroTask";

/// Load timer settings, falling back to defaults when absent, malformed,
/// or unreadable.
pub fn load_settings(store: &impl KeyValueStore) -> TimerSettings {
    load_settings_or(store, TimerSettings::default())
}

/// Like [`load_settings`] with an explicit fallback.
pub fn load_settings_or(store: &impl KeyValueStore, fallback: TimerSettings) -> TimerSettings {
    match store.get(SETTINGS_KEY) {
        Ok(Some(json)) => TimerSettings::from_stored_or(&json, fallback),
        Ok(None) => fallback,
        Err(e) => {
            warn!(error = %e, "could not read timer settings, using defaults");
            fallback
        }
    }
}

/// # Errors
/// Returns an error if the settings cannot be serialized or written.
pub fn save_settings(store: &impl KeyValueStore, settings: &TimerSettings) -> Result<()> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)
}

/// # Errors
/// Returns an error if the store cannot be read.
pub fn load_task(store: &impl KeyValueStore) -> Result<Option<TaskId>> {
    Ok(store.get(CURRENT_TASK_KEY)?.as_deref().and_then(TaskId::parse))
}

/// Store the selected task, or remove the entry when there is none.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn save_task(store: &impl KeyValueStore, task_id: Option<&TaskId>) -> Result<()> {
    match task_id {
        Some(id) => store.set(CURRENT_TASK_KEY, id.as_str()),
        None => store.remove(CURRENT_TASK_KEY),
    }
}
