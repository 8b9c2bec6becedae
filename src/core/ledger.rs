//! Supply ledger: queued players per role and the fixed party recipe.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tank/healer/DPS triple.
///
/// Used both for the queued counters and for the per-party recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Supply {
    /// Tanks.
    pub tanks: u64,
    /// Healers.
    pub healers: u64,
    /// Damage dealers.
    pub dps: u64,
}

impl Supply {
    /// Build a triple.
    #[must_use]
    pub const fn new(tanks: u64, healers: u64, dps: u64) -> Self {
        Self {
            tanks,
            healers,
            dps,
        }
    }

    /// The standard 1 tank, 1 healer, 3 DPS party.
    #[must_use]
    pub const fn standard_party() -> Self {
        Self::new(1, 1, 3)
    }

    /// True when every component is at least the matching component of `other`.
    #[must_use]
    pub const fn covers(&self, other: &Self) -> bool {
        self.tanks >= other.tanks && self.healers >= other.healers && self.dps >= other.dps
    }

    /// True when no component is zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.tanks > 0 && self.healers > 0 && self.dps > 0
    }
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T, {}H, {}D", self.tanks, self.healers, self.dps)
    }
}

/// Queued players and the recipe consumed by each party.
///
/// Counters only ever decrease, and only by a whole recipe at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyLedger {
    counters: Supply,
    recipe: Supply,
}

impl SupplyLedger {
    /// Create a ledger. Returns `None` if any recipe component is zero.
    #[must_use]
    pub const fn new(counters: Supply, recipe: Supply) -> Option<Self> {
        if !recipe.is_positive() {
            return None;
        }
        Some(Self { counters, recipe })
    }

    /// Current queued counts.
    #[must_use]
    pub const fn counters(&self) -> Supply {
        self.counters
    }

    /// Per-party recipe.
    #[must_use]
    pub const fn recipe(&self) -> Supply {
        self.recipe
    }

    /// True iff one full recipe can be taken from the queue.
    #[must_use]
    pub const fn can_form(&self) -> bool {
        self.counters.covers(&self.recipe)
    }

    /// How many parties the remaining queue could still produce.
    #[must_use]
    pub fn formable_groups(&self) -> u64 {
        (self.counters.tanks / self.recipe.tanks)
            .min(self.counters.healers / self.recipe.healers)
            .min(self.counters.dps / self.recipe.dps)
    }

    /// Take one recipe out of the queue.
    ///
    /// # Panics
    ///
    /// Panics if [`can_form`](Self::can_form) is false; callers must check under the
    /// same lock.
    pub fn consume(&mut self) {
        assert!(
            self.can_form(),
            "consume called without a full recipe available ({} < {})",
            self.counters,
            self.recipe
        );
        self.counters.tanks -= self.recipe.tanks;
        self.counters.healers -= self.recipe.healers;
        self.counters.dps -= self.recipe.dps;
    }
}
