//! Run configuration.

pub mod run;

pub use run::{DurationRange, RunConfig};
