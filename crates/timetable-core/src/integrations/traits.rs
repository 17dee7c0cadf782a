use std::future::Future;

use crate::error::Result;
use crate::events::{Notice, Notification, TimerEvent};
use crate::timer::{TaskId, TaskStatus};

/// Backend that tracks the status of study tasks.
pub trait TaskApi {
    /// Report `status` for `task_id`. Resolves to the backend's `success`
    /// flag; transport, HTTP and decoding failures are errors.
    fn update_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> impl Future<Output = Result<bool>>;
}

/// Receives everything the timer wants shown to the user.
/// Rendering, sounds and desktop notifications live behind this trait.
pub trait TimerObserver {
    /// Called for every lifecycle event.
    fn on_event(&mut self, event: &TimerEvent);

    /// Called when a phase finishes.
    fn on_notification(&mut self, _notification: &Notification) {
        // default no-op
    }

    /// Called with transient status messages, such as task update results.
    fn on_notice(&mut self, _notice: &Notice) {
        // default no-op
    }
}
