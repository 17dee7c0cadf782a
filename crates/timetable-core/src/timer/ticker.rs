//! Cancellable one-second tick source.
//!
//! A [`TickSource`] is a spawned tokio task that sends a [`Tick`] down a
//! channel once per period. The handle owns the task: dropping it aborts the
//! task, so a tick source can never outlive the run that created it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// One delivery from a tick source.
///
/// `generation` identifies the source; receivers discard ticks from a
/// source they have already released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

#[derive(Debug)]
pub struct TickSource {
    generation: u64,
    handle: JoinHandle<()>,
}

impl TickSource {
    /// Spawn a source that first fires one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(generation: u64, period: Duration, tx: mpsc::UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        debug!(generation, ?period, "tick source started");
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(generation = self.generation, "tick source released");
    }
}
