//! Runtime adapters for occupancy tasks.

pub mod tokio_spawner;

pub use tokio_spawner::TokioSpawner;
