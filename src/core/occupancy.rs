//! Occupancy tasks: one per formed party, alive for the length of its dungeon run.

use std::future::Future;
use std::sync::Arc;

use crate::core::context::RunContext;
use crate::core::instance::InstanceId;
use crate::core::report::RunEvent;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// A party running a dungeon in one instance.
///
/// Holds the instance by id only; the pool keeps ownership.
#[derive(Debug)]
pub struct OccupancyTask {
    ctx: Arc<RunContext>,
    instance: InstanceId,
}

impl OccupancyTask {
    /// Bind a task to an instance the scheduler just assigned.
    #[must_use]
    pub const fn new(ctx: Arc<RunContext>, instance: InstanceId) -> Self {
        Self { ctx, instance }
    }

    /// Instance this task occupies.
    #[must_use]
    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Sleep for a freshly drawn duration, then free the instance and wake waiters.
    ///
    /// The scheduler spawns this wrapped so that any panic aborts the process.
    pub async fn run(self) {
        let duration = self.ctx.next_duration();
        // Configured ranges are capped at `u32::MAX` units; longer custom draws saturate.
        let units = u32::try_from(duration).unwrap_or(u32::MAX);
        tracing::debug!(instance = self.instance, duration, "dungeon run started");

        tokio::time::sleep(self.ctx.time_unit().saturating_mul(units)).await;

        self.release(duration);
        self.ctx.notify_all();
    }

    fn release(&self, duration: u64) {
        let mut state = self.ctx.lock();
        state.complete_group(self.instance, duration);
        tracing::debug!(
            instance = self.instance,
            duration,
            active = state.pool().active_groups(),
            "dungeon run finished"
        );
        self.ctx.report(&RunEvent::GroupCompleted {
            instance: self.instance,
            duration,
            snapshot: state.snapshot(),
        });
    }
}
