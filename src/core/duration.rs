//! Dungeon run durations.
//!
//! Generation is deliberately outside the run lock: `UniformDurations` keeps its
//! RNG behind its own mutex, so durations are drawn concurrently with, and in no
//! particular order relative to, party formation.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DurationRange;

/// Supplies a run duration in time units. Called concurrently from occupancy tasks.
pub trait DurationSource: Send + Sync {
    /// Draw the next duration.
    fn generate(&self) -> u64;
}

impl<F> DurationSource for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn generate(&self) -> u64 {
        self()
    }
}

/// Uniformly distributed durations in `[min, max]`.
#[derive(Debug)]
pub struct UniformDurations {
    range: DurationRange,
    rng: Mutex<StdRng>,
}

impl UniformDurations {
    /// Entropy-seeded generator. A reversed range is swapped.
    #[must_use]
    pub fn new(range: DurationRange) -> Self {
        Self {
            range: range.normalized(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic generator for reproducible runs.
    #[must_use]
    pub fn seeded(range: DurationRange, seed: u64) -> Self {
        Self {
            range: range.normalized(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The (normalized) range durations are drawn from.
    #[must_use]
    pub const fn range(&self) -> DurationRange {
        self.range
    }
}

impl DurationSource for UniformDurations {
    fn generate(&self) -> u64 {
        self.rng.lock().random_range(self.range.min..=self.range.max)
    }
}
