//! # Timetable Core Library
//!
//! The focus timer of the Timetable study planner, independent of any user
//! interface. The CLI binary and any GUI are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Planner**: derives break lengths and session counts from the focus
//!   length (5:1:3 ratio)
//! - **Clock / State machine**: a countdown that is advanced one second at a
//!   time, wrapped in a Focus/Break state machine that returns side-effect
//!   requests instead of performing them
//! - **Controller**: owns one session, a cancellable tick source, and the
//!   collaborators that carry out effects
//! - **Storage**: SQLite key-value persistence and TOML configuration
//! - **Integrations**: task status backend and observer traits
//!
//! ## Key Components
//!
//! - [`TimerStateMachine`]: Focus/Break state machine
//! - [`TimerController`]: session owner and effect executor
//! - [`SessionPlanner`]: schedule derivation
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration

pub mod controller;
pub mod error;
pub mod events;
pub mod integrations;
pub mod storage;
pub mod timer;

pub use controller::TimerController;
pub use error::{ConfigError, CoreError, StorageError, TaskApiError};
pub use events::{Notice, NoticeLevel, Notification, TimerAction, TimerEvent};
pub use integrations::{HttpTaskApi, TaskApi, TimerObserver};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use timer::{
    BreakKind, DerivedSchedule, Effect, Phase, SessionPlanner, TaskId, TaskStatus, TimerClock,
    TimerSettings, TimerSnapshot, TimerStateMachine,
};
