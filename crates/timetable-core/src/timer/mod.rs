mod clock;
mod effect;
mod machine;
mod planner;
mod settings;
mod task;
mod ticker;

pub use clock::{ClockTick, TimerClock};
pub use effect::Effect;
pub use machine::{BreakKind, Phase, TimerSnapshot, TimerStateMachine};
pub use planner::{clamp_focus, DerivedSchedule, SessionPlanner, DEFAULT_FOCUS_MINUTES};
pub use settings::TimerSettings;
pub use task::{TaskId, TaskStatus};
pub use ticker::{Tick, TickSource};
