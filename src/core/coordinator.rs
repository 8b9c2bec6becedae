//! Top-level run driver.

use std::sync::Arc;

use tracing::{info, info_span};

use crate::core::context::RunContext;
use crate::core::error::SchedulerError;
use crate::core::occupancy::Spawn;
use crate::core::report::{RunEvent, RunSummary};
use crate::core::scheduler::Scheduler;

/// Owns a run: starts the scheduler, waits for quiescence, reports the outcome.
///
/// Occupancy tasks are never joined individually. Quiescence implies no party is
/// inside an instance, so once the coordinator observes it under the lock every
/// task has already released its instance.
#[derive(Debug)]
pub struct Coordinator<S> {
    ctx: Arc<RunContext>,
    spawner: S,
}

impl<S> Coordinator<S>
where
    S: Spawn + Clone + Send + 'static,
{
    /// Create a coordinator for a prepared context.
    #[must_use]
    pub const fn new(ctx: Arc<RunContext>, spawner: S) -> Self {
        Self { ctx, spawner }
    }

    /// Shared run context.
    #[must_use]
    pub const fn context(&self) -> &Arc<RunContext> {
        &self.ctx
    }

    /// Run to quiescence, blocking the calling thread.
    ///
    /// Must not be called from an async worker thread; use
    /// [`run_async`](Self::run_async) there.
    ///
    /// # Errors
    ///
    /// Fails if the scheduler thread cannot be spawned or panicked.
    pub fn run(self) -> Result<RunSummary, SchedulerError> {
        let span = info_span!("run", run_id = %self.ctx.run_id());
        let _enter = span.enter();

        {
            let state = self.ctx.lock();
            info!(
                instances = state.pool().len(),
                queue = %state.ledger().counters(),
                formable = state.ledger().formable_groups(),
                "starting run"
            );
            self.ctx.report(&RunEvent::Started(state.snapshot()));
        }

        let scheduler = Scheduler::new(Arc::clone(&self.ctx), self.spawner.clone()).spawn()?;

        {
            let mut state = self.ctx.lock();
            state.mark_ready();
            self.ctx.notify_all();
            self.ctx.wait_while(&mut state, |s| !s.is_quiescent());
        }

        let dispatched = scheduler
            .join()
            .map_err(|_| SchedulerError::SchedulerPanicked)?;

        let summary = self.ctx.lock().summary(self.ctx.run_id());
        info!(
            dispatched,
            groups = summary.groups_formed,
            remaining = %summary.remaining,
            "run complete"
        );
        self.ctx.report(&RunEvent::Finished(summary.clone()));
        Ok(summary)
    }

    /// Run to quiescence from async code, parking the blocking wait on tokio's
    /// blocking pool.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), plus `SchedulerError::Runtime` if the blocking
    /// task itself fails.
    pub async fn run_async(self) -> Result<RunSummary, SchedulerError> {
        tokio::task::spawn_blocking(move || self.run())
            .await
            .map_err(|e| SchedulerError::Runtime(e.to_string()))?
    }
}
