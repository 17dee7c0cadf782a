mod config;
pub mod database;
pub mod memory;
pub mod settings;

pub use config::{ApiConfig, Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::Result;

/// String key-value storage for state that must survive restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Returns `~/.config/timetable[-dev]/`.
///
/// `TIMETABLE_DATA_DIR` overrides the location entirely; otherwise
/// `TIMETABLE_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TIMETABLE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMETABLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timetable-dev")
            } else {
                base_dir.join("timetable")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
