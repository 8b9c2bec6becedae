//! Tests for configuration validation

use std::env;
use std::path::PathBuf;

use dungeon_queue::config::{DurationRange, RunConfig};
use dungeon_queue::core::Supply;
use parking_lot::Mutex;

fn valid() -> RunConfig {
    RunConfig::new(3, Supply::new(5, 5, 15), DurationRange::new(1, 15))
}

#[test]
fn test_run_config_validation() {
    assert!(valid().validate().is_ok());
}

#[test]
fn test_run_config_invalid_instances() {
    let mut invalid = valid();
    invalid.instances = 0;
    assert!(invalid.validate().is_err());
}

#[test]
fn test_run_config_invalid_recipe() {
    let invalid = valid().with_recipe(Supply::new(1, 1, 0));
    assert!(invalid.validate().is_err());
}

#[test]
fn test_run_config_invalid_worker_threads() {
    let invalid = valid().with_worker_threads(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_run_config_rejects_oversized_durations() {
    let too_long = u64::from(u32::MAX) + 1;
    let invalid = RunConfig::new(1, Supply::default(), DurationRange::new(1, too_long));
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("durations"));

    let reversed = RunConfig::new(1, Supply::default(), DurationRange::new(too_long, 1));
    assert!(reversed.validate().is_err());

    let longest = RunConfig::new(1, Supply::default(), DurationRange::new(1, u32::MAX.into()));
    assert!(longest.validate().is_ok());
}

#[test]
fn test_empty_queue_is_valid() {
    let cfg = RunConfig::new(1, Supply::default(), DurationRange::new(1, 1));
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_normalized_swaps_bounds() {
    let cfg = RunConfig::new(1, Supply::default(), DurationRange::new(9, 2)).normalized();
    assert_eq!(cfg.durations, DurationRange::new(2, 9));
}

#[test]
fn test_run_config_from_json() {
    let json = r#"{
        "instances": 4,
        "supply": { "tanks": 10, "healers": 8, "dps": 30 },
        "durations": { "min": 3, "max": 1 },
        "seed": 17
    }"#;

    let cfg = RunConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.instances, 4);
    assert_eq!(cfg.supply, Supply::new(10, 8, 30));
    assert_eq!(cfg.recipe, Supply::standard_party());
    assert_eq!(cfg.durations, DurationRange::new(1, 3));
    assert_eq!(cfg.time_unit_ms, 1000);
    assert_eq!(cfg.seed, Some(17));
    assert_eq!(cfg.worker_threads, None);
}

#[test]
fn test_run_config_from_json_rejects_zero_instances() {
    let json = r#"{
        "instances": 0,
        "supply": { "tanks": 1, "healers": 1, "dps": 3 },
        "durations": { "min": 1, "max": 1 }
    }"#;
    let err = RunConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("instances"));
}

#[test]
fn test_run_config_from_json_rejects_negative_counts() {
    let json = r#"{
        "instances": 1,
        "supply": { "tanks": -1, "healers": 1, "dps": 3 },
        "durations": { "min": 1, "max": 1 }
    }"#;
    let err = RunConfig::from_json_str(json).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_run_config_json_roundtrip_keeps_recipe() {
    let cfg = valid().with_recipe(Supply::new(2, 2, 2)).with_time_unit_ms(5);
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(RunConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_run_config_from_json_rejects_oversized_durations() {
    let json = r#"{
        "instances": 1,
        "supply": { "tanks": 1, "healers": 1, "dps": 3 },
        "durations": { "min": 1, "max": 5000000000 }
    }"#;
    let err = RunConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("durations"));
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

const LFG_VARS: [&str; 10] = [
    "LFG_INSTANCES",
    "LFG_TANKS",
    "LFG_HEALERS",
    "LFG_DPS",
    "LFG_MIN_TIME",
    "LFG_MAX_TIME",
    "LFG_RECIPE",
    "LFG_TIME_UNIT_MS",
    "LFG_SEED",
    "LFG_WORKER_THREADS",
];

const REQUIRED: [(&str, &str); 6] = [
    ("LFG_INSTANCES", "3"),
    ("LFG_TANKS", "4"),
    ("LFG_HEALERS", "5"),
    ("LFG_DPS", "12"),
    ("LFG_MIN_TIME", "1"),
    ("LFG_MAX_TIME", "4"),
];

/// Serializes tests that touch the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with exactly `vars` set among the `LFG_*` variables.
fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let _guard = ENV_LOCK.lock();
    for key in LFG_VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }
    let result = f();
    for key in LFG_VARS {
        env::remove_var(key);
    }
    result
}

fn required_except(skip: &str) -> Vec<(&'static str, &'static str)> {
    REQUIRED.into_iter().filter(|(k, _)| *k != skip).collect()
}

fn temp_env_file(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("dungeon-queue-{}-{name}.env", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_run_config_from_env() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("LFG_MIN_TIME", "9"),
        ("LFG_MAX_TIME", "2"),
        ("LFG_HEALERS", " 5 "),
        ("LFG_RECIPE", "2, 1,2"),
        ("LFG_TIME_UNIT_MS", "5"),
        ("LFG_SEED", "7"),
        ("LFG_WORKER_THREADS", "2"),
    ]);

    let cfg = with_env(&vars, RunConfig::from_env).unwrap();
    assert_eq!(cfg.instances, 3);
    assert_eq!(cfg.supply, Supply::new(4, 5, 12));
    assert_eq!(cfg.durations, DurationRange::new(2, 9));
    assert_eq!(cfg.recipe, Supply::new(2, 1, 2));
    assert_eq!(cfg.time_unit_ms, 5);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.worker_threads, Some(2));
}

#[test]
fn test_run_config_from_env_defaults() {
    let cfg = with_env(&REQUIRED, RunConfig::from_env).unwrap();
    assert_eq!(cfg.recipe, Supply::standard_party());
    assert_eq!(cfg.durations, DurationRange::new(1, 4));
    assert_eq!(cfg.time_unit_ms, 1000);
    assert_eq!(cfg.seed, None);
    assert_eq!(cfg.worker_threads, None);
}

#[test]
fn test_run_config_from_env_missing_variable() {
    let err = with_env(&required_except("LFG_DPS"), RunConfig::from_env).unwrap_err();
    assert_eq!(err, "LFG_DPS is not set");
}

#[test]
fn test_run_config_from_env_unparsable_variable() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("LFG_TANKS", "many"));
    let err = with_env(&vars, RunConfig::from_env).unwrap_err();
    assert!(err.starts_with("LFG_TANKS:"), "{err}");
}

#[test]
fn test_run_config_from_env_rejects_zero_instances() {
    let mut vars = required_except("LFG_INSTANCES");
    vars.push(("LFG_INSTANCES", "0"));
    let err = with_env(&vars, RunConfig::from_env).unwrap_err();
    assert!(err.contains("instances"), "{err}");
}

#[test]
fn test_run_config_from_env_file() {
    let path = temp_env_file("valid", "LFG_INSTANCES=2\nLFG_TANKS=1\nLFG_HEALERS=1\nLFG_DPS=3\n");
    let vars = [("LFG_INSTANCES", "5"), ("LFG_MIN_TIME", "1"), ("LFG_MAX_TIME", "1")];

    let cfg = with_env(&vars, || RunConfig::from_env_file(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();

    // Variables already in the process take precedence over the file.
    assert_eq!(cfg.instances, 5);
    assert_eq!(cfg.supply, Supply::new(1, 1, 3));
}

#[test]
fn test_run_config_from_env_file_malformed() {
    let path = temp_env_file("malformed", "<><><>\n");

    let err = with_env(&REQUIRED, || RunConfig::from_env_file(&path)).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    assert!(err.starts_with("env file"), "{err}");
}

#[test]
fn test_run_config_from_missing_env_file() {
    let path = env::temp_dir().join("dungeon-queue-absent.env");
    let cfg = with_env(&REQUIRED, || RunConfig::from_env_file(&path)).unwrap();
    assert_eq!(cfg.instances, 3);
}
