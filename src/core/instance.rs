//! Dungeon instances and the fixed-size pool that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an instance: its index in the pool.
pub type InstanceId = usize;

/// Occupancy of a single instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceState {
    /// No party inside; may be assigned.
    Free,
    /// A party is running the dungeon.
    Occupied,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("empty"),
            Self::Occupied => f.write_str("active"),
        }
    }
}

/// One slot of the pool with its cumulative statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    id: InstanceId,
    state: InstanceState,
    groups_served: u64,
    total_busy_time: u64,
}

impl Instance {
    const fn new(id: InstanceId) -> Self {
        Self {
            id,
            state: InstanceState::Free,
            groups_served: 0,
            total_busy_time: 0,
        }
    }

    /// Instance identifier.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Current occupancy.
    #[must_use]
    pub const fn state(&self) -> InstanceState {
        self.state
    }

    /// Parties that have completed a run here.
    #[must_use]
    pub const fn groups_served(&self) -> u64 {
        self.groups_served
    }

    /// Sum of all completed run durations, in time units.
    #[must_use]
    pub const fn total_busy_time(&self) -> u64 {
        self.total_busy_time
    }

    fn occupy(&mut self) {
        assert!(
            self.state == InstanceState::Free,
            "instance {} assigned while already occupied",
            self.id
        );
        self.state = InstanceState::Occupied;
    }

    fn vacate(&mut self, duration: u64) {
        assert!(
            self.state == InstanceState::Occupied,
            "instance {} released while already free",
            self.id
        );
        self.state = InstanceState::Free;
        self.groups_served += 1;
        self.total_busy_time += duration;
    }
}

/// Fixed-size set of instances plus the count of parties currently inside them.
///
/// The size never changes after construction. `active_groups` always equals the
/// number of occupied instances.
#[derive(Debug, Clone)]
pub struct InstancePool {
    instances: Vec<Instance>,
    active: usize,
}

impl InstancePool {
    /// Create `size` free instances with ids `0..size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            instances: (0..size).map(Instance::new).collect(),
            active: 0,
        }
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True for a pool with no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Parties currently occupying an instance.
    #[must_use]
    pub const fn active_groups(&self) -> usize {
        self.active
    }

    /// Count of instances in the `Occupied` state, derived by scanning.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.instances
            .iter()
            .filter(|i| i.state == InstanceState::Occupied)
            .count()
    }

    /// All instances, ordered by id.
    #[must_use]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Lowest-id free instance, if any.
    #[must_use]
    pub fn find_free(&self) -> Option<InstanceId> {
        self.instances
            .iter()
            .position(|i| i.state == InstanceState::Free)
    }

    /// Mark `id` occupied and count the new active party.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or already occupied.
    pub fn assign(&mut self, id: InstanceId) {
        self.instances[id].occupy();
        self.active += 1;
    }

    /// Mark `id` free, crediting it with one served party and `duration` busy time.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or already free.
    pub fn release(&mut self, id: InstanceId, duration: u64) {
        self.instances[id].vacate(duration);
        self.active -= 1;
    }
}
