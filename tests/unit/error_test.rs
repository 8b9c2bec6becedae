//! Tests for error types

use dungeon_queue::core::SchedulerError;

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("instances must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: instances must be greater than 0"
    );
}

#[test]
fn test_spawn_error() {
    let err = SchedulerError::Spawn("scheduler thread: out of memory".to_string());
    assert_eq!(format!("{}", err), "spawn failed: scheduler thread: out of memory");
}

#[test]
fn test_scheduler_panicked_error() {
    let err = SchedulerError::SchedulerPanicked;
    assert_eq!(format!("{}", err), "scheduler thread panicked");
}

#[test]
fn test_runtime_error() {
    let err = SchedulerError::Runtime("task cancelled".to_string());
    assert_eq!(format!("{}", err), "runtime error: task cancelled");
}

#[test]
fn test_converts_into_anyhow() {
    let result: dungeon_queue::core::AppResult<()> = Err(SchedulerError::SchedulerPanicked.into());
    assert_eq!(result.unwrap_err().to_string(), "scheduler thread panicked");
}
