//! Shared run state and the single lock that guards it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex, MutexGuard};
use uuid::Uuid;

use crate::core::duration::DurationSource;
use crate::core::instance::{InstanceId, InstancePool};
use crate::core::ledger::SupplyLedger;
use crate::core::quiescence;
use crate::core::report::{ReportSink, RunEvent, RunSummary, StateSnapshot};

/// Everything mutable in a run.
///
/// Ledger and pool sit behind one lock together: forming a party and assigning it
/// an instance has to be a single decision.
#[derive(Debug)]
pub struct RunState {
    ledger: SupplyLedger,
    pool: InstancePool,
    ready: bool,
    groups_formed: u64,
}

impl RunState {
    /// Fresh state; the scheduler stays idle until [`mark_ready`](Self::mark_ready).
    #[must_use]
    pub const fn new(ledger: SupplyLedger, pool: InstancePool) -> Self {
        Self {
            ledger,
            pool,
            ready: false,
            groups_formed: 0,
        }
    }

    /// Queue ledger.
    #[must_use]
    pub const fn ledger(&self) -> &SupplyLedger {
        &self.ledger
    }

    /// Instance pool.
    #[must_use]
    pub const fn pool(&self) -> &InstancePool {
        &self.pool
    }

    /// Parties formed so far.
    #[must_use]
    pub const fn groups_formed(&self) -> u64 {
        self.groups_formed
    }

    /// Whether the initial queue has been handed over.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Allow the scheduler to start forming parties.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// See [`quiescence::is_quiescent`].
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        quiescence::is_quiescent(&self.ledger, &self.pool)
    }

    /// See [`quiescence::scheduler_should_wake`].
    #[must_use]
    pub fn scheduler_should_wake(&self) -> bool {
        quiescence::scheduler_should_wake(self.ready, &self.ledger, &self.pool)
    }

    /// Form one party and place it in the lowest free instance, or do nothing.
    pub fn try_form_group(&mut self) -> Option<InstanceId> {
        if !self.ledger.can_form() {
            return None;
        }
        let id = self.pool.find_free()?;
        self.ledger.consume();
        self.pool.assign(id);
        self.groups_formed += 1;
        Some(id)
    }

    /// Free `id` after a run of `duration` time units.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not occupied.
    pub fn complete_group(&mut self, id: InstanceId, duration: u64) {
        self.pool.release(id, duration);
    }

    /// Current queue and pool.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.ledger, &self.pool)
    }

    /// Final report for the run.
    #[must_use]
    pub fn summary(&self, run_id: Uuid) -> RunSummary {
        RunSummary {
            run_id,
            groups_formed: self.groups_formed,
            remaining: self.ledger.counters(),
            instances: self.snapshot().instances,
        }
    }
}

/// Context shared by the coordinator, the scheduler and every occupancy task.
pub struct RunContext {
    run_id: Uuid,
    state: Mutex<RunState>,
    wake: Condvar,
    sink: Arc<dyn ReportSink>,
    durations: Arc<dyn DurationSource>,
    time_unit: Duration,
}

impl RunContext {
    /// Bundle the initial state with its collaborators.
    #[must_use]
    pub fn new(
        state: RunState,
        sink: Arc<dyn ReportSink>,
        durations: Arc<dyn DurationSource>,
        time_unit: Duration,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: Mutex::new(state),
            wake: Condvar::new(),
            sink,
            durations,
            time_unit,
        }
    }

    /// Identifier of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Wall-clock length of one duration unit.
    #[must_use]
    pub const fn time_unit(&self) -> Duration {
        self.time_unit
    }

    /// Enter the exclusive-access region.
    pub fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock()
    }

    /// Block until `condition` returns false, releasing the lock while asleep.
    pub fn wait_while<F>(&self, guard: &mut MutexGuard<'_, RunState>, condition: F)
    where
        F: FnMut(&mut RunState) -> bool,
    {
        self.wake.wait_while(guard, condition);
    }

    /// Wake every thread blocked in [`wait_while`](Self::wait_while).
    pub fn notify_all(&self) {
        self.wake.notify_all();
    }

    /// Draw a run duration. Does not touch the run lock.
    pub fn next_duration(&self) -> u64 {
        self.durations.generate()
    }

    /// Forward an event to the sink.
    pub fn report(&self, event: &RunEvent) {
        self.sink.report(event);
    }

    /// Atomically form a party and assign it an instance, if both are possible.
    ///
    /// Does not spawn anything; the scheduler is the only caller that launches
    /// occupancy tasks.
    pub fn try_dispatch(&self) -> Option<InstanceId> {
        self.lock().try_form_group()
    }

    /// Parties currently inside instances.
    #[must_use]
    pub fn active_groups(&self) -> usize {
        self.lock().pool().active_groups()
    }

    /// Evaluate the quiescence predicate under the lock.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.lock().is_quiescent()
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("time_unit", &self.time_unit)
            .finish_non_exhaustive()
    }
}
