//! Run events and reporting sinks.
//!
//! Events are emitted while the run lock is held so that their order matches the
//! order of state transitions. Sinks must therefore return promptly: either do
//! cheap in-memory work or hand the event to another thread.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::instance::{Instance, InstanceId, InstancePool, InstanceState};
use crate::core::ledger::{Supply, SupplyLedger};

/// Point-in-time view of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    /// Instance identifier.
    pub id: InstanceId,
    /// Occupancy at snapshot time.
    pub state: InstanceState,
    /// Parties served so far.
    pub groups_served: u64,
    /// Accumulated busy time in time units.
    pub total_busy_time: u64,
}

impl From<&Instance> for InstanceSnapshot {
    fn from(instance: &Instance) -> Self {
        Self {
            id: instance.id(),
            state: instance.state(),
            groups_served: instance.groups_served(),
            total_busy_time: instance.total_busy_time(),
        }
    }
}

/// Point-in-time view of the queue and the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Players still queued.
    pub supply: Supply,
    /// Parties currently inside instances.
    pub active_groups: usize,
    /// Every instance, ordered by id.
    pub instances: Vec<InstanceSnapshot>,
}

impl StateSnapshot {
    /// Capture the current ledger and pool.
    #[must_use]
    pub fn capture(ledger: &SupplyLedger, pool: &InstancePool) -> Self {
        Self {
            supply: ledger.counters(),
            active_groups: pool.active_groups(),
            instances: pool.instances().iter().map(InstanceSnapshot::from).collect(),
        }
    }

    /// Instances in the `Occupied` state.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.instances
            .iter()
            .filter(|i| i.state == InstanceState::Occupied)
            .count()
    }
}

/// Final outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the run.
    pub run_id: Uuid,
    /// Parties formed over the whole run.
    pub groups_formed: u64,
    /// Players left in the queue.
    pub remaining: Supply,
    /// Per-instance statistics.
    pub instances: Vec<InstanceSnapshot>,
}

impl RunSummary {
    /// Sum of busy time across all instances.
    #[must_use]
    pub fn total_busy_time(&self) -> u64 {
        self.instances.iter().map(|i| i.total_busy_time).sum()
    }
}

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// Initial queue and pool, before the scheduler starts.
    Started(StateSnapshot),
    /// A party was formed and placed in `instance`.
    GroupFormed {
        /// Instance the party was assigned to.
        instance: InstanceId,
        /// State right after the assignment.
        snapshot: StateSnapshot,
    },
    /// The party in `instance` finished after `duration` time units.
    GroupCompleted {
        /// Instance that became free.
        instance: InstanceId,
        /// Run length in time units.
        duration: u64,
        /// State right after the release.
        snapshot: StateSnapshot,
    },
    /// The run reached quiescence.
    Finished(RunSummary),
}

/// Receives run events. Must not block.
pub trait ReportSink: Send + Sync {
    /// Handle one event.
    fn report(&self, event: &RunEvent);
}

/// Renders events as structured tracing records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReportSink;

impl ReportSink for TracingReportSink {
    fn report(&self, event: &RunEvent) {
        match event {
            RunEvent::Started(s) => tracing::info!(
                tanks = s.supply.tanks,
                healers = s.supply.healers,
                dps = s.supply.dps,
                instances = s.instances.len(),
                "queue initialized"
            ),
            RunEvent::GroupFormed { instance, snapshot } => tracing::info!(
                instance,
                active = snapshot.active_groups,
                remaining = %snapshot.supply,
                "party formed"
            ),
            RunEvent::GroupCompleted {
                instance,
                duration,
                snapshot,
            } => tracing::info!(
                instance,
                duration,
                active = snapshot.active_groups,
                "instance freed"
            ),
            RunEvent::Finished(summary) => tracing::info!(
                run_id = %summary.run_id,
                groups = summary.groups_formed,
                remaining = %summary.remaining,
                "run finished"
            ),
        }
    }
}

/// Bounded in-memory sink for tests and inspection.
#[derive(Debug)]
pub struct InMemoryReportSink {
    events: Mutex<VecDeque<RunEvent>>,
    max_events: usize,
}

impl InMemoryReportSink {
    /// Keep at most `max_events`, dropping the oldest.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events,
        }
    }

    /// Copy of the stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl ReportSink for InMemoryReportSink {
    fn report(&self, event: &RunEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

/// Forwards events to an unbounded channel for a consumer on another thread.
#[derive(Debug, Clone)]
pub struct ChannelReportSink {
    tx: Sender<RunEvent>,
}

impl ChannelReportSink {
    /// Create a sink and the receiving end.
    #[must_use]
    pub fn new() -> (Self, Receiver<RunEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelReportSink {
    fn report(&self, event: &RunEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!("report receiver dropped; event discarded");
        }
    }
}
