//! Tests for builder modules

use std::sync::Arc;

use dungeon_queue::builders::RunBuilder;
use dungeon_queue::config::{DurationRange, RunConfig};
use dungeon_queue::core::{InstanceState, SchedulerError, Supply};

#[test]
fn test_run_builder_defaults() {
    let config = RunConfig::new(3, Supply::new(2, 2, 6), DurationRange::new(1, 5));
    let builder = RunBuilder::new(config.clone());
    assert_eq!(builder.config(), &config);

    let ctx = builder.build_context().unwrap();
    assert_eq!(ctx.time_unit().as_millis(), 1000);

    let state = ctx.lock();
    assert!(!state.is_ready());
    assert_eq!(state.pool().len(), 3);
    assert!(state
        .pool()
        .instances()
        .iter()
        .all(|i| i.state() == InstanceState::Free));
    assert_eq!(state.ledger().counters(), Supply::new(2, 2, 6));
    assert_eq!(state.ledger().recipe(), Supply::standard_party());
}

#[test]
fn test_run_builder_rejects_invalid_config() {
    let config = RunConfig::new(0, Supply::new(2, 2, 6), DurationRange::new(1, 5));
    let err = RunBuilder::new(config).build_context().unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_run_builder_custom_durations() {
    let config = RunConfig::new(1, Supply::new(1, 1, 3), DurationRange::new(1, 5));
    let ctx = RunBuilder::new(config)
        .with_durations(Arc::new(|| 42_u64))
        .build_context()
        .unwrap();
    assert_eq!(ctx.next_duration(), 42);
}

#[test]
fn test_run_builder_seeded_durations_in_range() {
    let config = RunConfig::new(1, Supply::new(1, 1, 3), DurationRange::new(7, 3)).with_seed(5);
    let ctx = RunBuilder::new(config).build_context().unwrap();
    for _ in 0..100 {
        assert!((3..=7).contains(&ctx.next_duration()));
    }
}
