//! # Dungeon Queue
//!
//! Concurrent party formation over a bounded pool of dungeon instances.
//!
//! Players wait in a shared queue split into three roles (tanks, healers, DPS). A
//! scheduler thread repeatedly takes one party's worth of players (1 tank, 1 healer,
//! 3 DPS by default) and places the party in the lowest-numbered free instance. Each
//! placement spawns an occupancy task that sleeps for a randomized run length, frees
//! the instance and wakes the scheduler. The run ends at quiescence: no instance is
//! occupied and the remaining queue cannot fill another party.
//!
//! ## Concurrency Model
//!
//! - **One lock**: queue counters and instance states live behind a single
//!   `parking_lot::Mutex`, so "a party can be formed" and "an instance is free" are
//!   decided together
//! - **No polling**: the scheduler and the coordinator block on a
//!   `parking_lot::Condvar`; occupancy tasks signal it after every release
//! - **Detached tasks**: occupancy tasks are never joined; quiescence observed under
//!   the lock guarantees none is still running
//! - **Fatal invariants**: a broken state transition aborts the process
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dungeon_queue::builders::RunBuilder;
//! use dungeon_queue::config::{DurationRange, RunConfig};
//! use dungeon_queue::core::Supply;
//! use dungeon_queue::runtime::TokioSpawner;
//!
//! let config = RunConfig::new(2, Supply::new(2, 2, 6), DurationRange::new(1, 3));
//! let spawner = TokioSpawner::with_worker_threads(config.effective_worker_threads())?;
//! let summary = RunBuilder::new(config).build(spawner)?.run()?;
//! assert_eq!(summary.groups_formed, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Builders to construct runs from configuration.
pub mod builders;
/// Configuration models for runs.
pub mod config;
/// Ledger, pool, scheduler, occupancy tasks and quiescence.
pub mod core;
/// Runtime adapters for spawning occupancy tasks.
pub mod runtime;
/// Shared utilities.
pub mod util;
