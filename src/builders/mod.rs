//! Builders that turn configuration into a ready-to-run coordinator.

pub mod run_builder;

pub use run_builder::RunBuilder;
