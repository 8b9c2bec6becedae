//! Party-forming scheduler loop.
//!
//! Runs on a dedicated OS thread and sleeps on the run condvar between decisions.
//! Each wake it either exits (quiescent), or forms one party, assigns it the lowest
//! free instance and spawns its occupancy task, all without releasing the lock.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::core::context::RunContext;
use crate::core::error::{abort_on_panic, AbortOnPanic, SchedulerError};
use crate::core::occupancy::{OccupancyTask, Spawn};
use crate::core::report::RunEvent;

/// Drives party formation for one run.
#[derive(Debug)]
pub struct Scheduler<S> {
    ctx: Arc<RunContext>,
    spawner: S,
}

impl<S> Scheduler<S>
where
    S: Spawn + Send + 'static,
{
    /// Create a scheduler over a shared context.
    #[must_use]
    pub const fn new(ctx: Arc<RunContext>, spawner: S) -> Self {
        Self { ctx, spawner }
    }

    /// Start the loop on its own thread. The handle yields the number of parties
    /// this scheduler dispatched.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Spawn` if the OS refuses to create the thread.
    pub fn spawn(self) -> Result<JoinHandle<u64>, SchedulerError> {
        thread::Builder::new()
            .name("lfg-scheduler".into())
            .spawn(move || abort_on_panic("scheduler", || self.run()))
            .map_err(|e| SchedulerError::Spawn(format!("scheduler thread: {e}")))
    }

    /// Run the loop on the calling thread until the run is quiescent.
    pub fn run(self) -> u64 {
        let mut dispatched = 0;
        let mut state = self.ctx.lock();
        debug!(run_id = %self.ctx.run_id(), "scheduler waiting for queue");

        loop {
            self.ctx
                .wait_while(&mut state, |s| !s.scheduler_should_wake());

            if state.is_quiescent() {
                info!(
                    dispatched,
                    remaining = %state.ledger().counters(),
                    "no more parties can be formed; scheduler exiting"
                );
                break;
            }

            let Some(instance) = state.try_form_group() else {
                continue;
            };
            dispatched += 1;

            debug!(
                instance,
                active = state.pool().active_groups(),
                remaining = %state.ledger().counters(),
                "party assigned"
            );
            self.ctx.report(&RunEvent::GroupFormed {
                instance,
                snapshot: state.snapshot(),
            });
            let task = OccupancyTask::new(Arc::clone(&self.ctx), instance);
            self.spawner
                .spawn(AbortOnPanic::new("occupancy task", task.run()));
        }

        dispatched
    }
}
