//! Run configuration structures.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::ledger::Supply;

/// Inclusive bounds for dungeon run durations, in time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    /// Shortest run.
    pub min: u64,
    /// Longest run.
    pub max: u64,
}

impl DurationRange {
    /// Build a range as given; see [`normalized`](Self::normalized).
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Same range with the bounds swapped if they were given in reverse.
    #[must_use]
    pub const fn normalized(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }
}

/// Everything needed to start a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of dungeon instances (`n`).
    pub instances: usize,
    /// Initial queue.
    pub supply: Supply,
    /// Players consumed per party.
    #[serde(default = "Supply::standard_party")]
    pub recipe: Supply,
    /// Run duration bounds.
    pub durations: DurationRange,
    /// Milliseconds per duration unit.
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,
    /// Seed for reproducible durations.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Async worker threads for occupancy tasks; defaults to the CPU count.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

const fn default_time_unit_ms() -> u64 {
    1000
}

impl RunConfig {
    /// Config with the standard recipe, one-second units, no seed.
    #[must_use]
    pub const fn new(instances: usize, supply: Supply, durations: DurationRange) -> Self {
        Self {
            instances,
            supply,
            recipe: Supply::standard_party(),
            durations,
            time_unit_ms: default_time_unit_ms(),
            seed: None,
            worker_threads: None,
        }
    }

    /// Override the unit length.
    #[must_use]
    pub const fn with_time_unit_ms(mut self, ms: u64) -> Self {
        self.time_unit_ms = ms;
        self
    }

    /// Override the recipe.
    #[must_use]
    pub const fn with_recipe(mut self, recipe: Supply) -> Self {
        self.recipe = recipe;
        self
    }

    /// Fix the duration seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fix the async worker thread count.
    #[must_use]
    pub const fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Unit length as a `Duration`.
    #[must_use]
    pub const fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// Configured worker threads, or one per CPU.
    #[must_use]
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Swap reversed duration bounds.
    #[must_use]
    pub const fn normalized(mut self) -> Self {
        self.durations = self.durations.normalized();
        self
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.instances == 0 {
            return Err("instances must be greater than 0".into());
        }
        if !self.recipe.is_positive() {
            return Err("every recipe component must be greater than 0".into());
        }
        if self.worker_threads == Some(0) {
            return Err("worker_threads must be greater than 0".into());
        }
        if self.durations.min.max(self.durations.max) > u64::from(u32::MAX) {
            return Err(format!("durations must not exceed {} units", u32::MAX));
        }
        Ok(())
    }

    /// Parse from JSON, normalize and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        let cfg = cfg.normalized();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `LFG_*` variables, loading a `.env` file first if one exists.
    ///
    /// Required: `LFG_INSTANCES`, `LFG_TANKS`, `LFG_HEALERS`, `LFG_DPS`,
    /// `LFG_MIN_TIME`, `LFG_MAX_TIME`. Optional: `LFG_RECIPE` (`"t,h,d"`),
    /// `LFG_TIME_UNIT_MS`, `LFG_SEED`, `LFG_WORKER_THREADS`.
    /// Variables already set in the process win over the file.
    ///
    /// # Errors
    ///
    /// Returns a message for an unreadable or malformed `.env`, a missing or
    /// unparsable variable, or failed validation.
    pub fn from_env() -> Result<Self, String> {
        env_file_loaded(dotenvy::dotenv())?;
        Self::from_process_env()
    }

    /// Like [`from_env`](Self::from_env), loading the given file instead of `.env`.
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, String> {
        env_file_loaded(dotenvy::from_path(path))?;
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self, String> {
        let mut cfg = Self::new(
            required("LFG_INSTANCES")?,
            Supply::new(
                required("LFG_TANKS")?,
                required("LFG_HEALERS")?,
                required("LFG_DPS")?,
            ),
            DurationRange::new(required("LFG_MIN_TIME")?, required("LFG_MAX_TIME")?),
        );
        if let Ok(raw) = env::var("LFG_RECIPE") {
            cfg.recipe = parse_recipe(&raw)?;
        }
        if let Some(ms) = optional("LFG_TIME_UNIT_MS")? {
            cfg.time_unit_ms = ms;
        }
        cfg.seed = optional("LFG_SEED")?;
        cfg.worker_threads = optional("LFG_WORKER_THREADS")?;

        let cfg = cfg.normalized();
        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_file_loaded<T>(loaded: Result<T, dotenvy::Error>) -> Result<(), String> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(format!("env file: {e}")),
    }
}

fn required<T: FromStr>(key: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    optional(key)?.ok_or_else(|| format!("{key} is not set"))
}

fn optional<T: FromStr>(key: &str) -> Result<Option<T>, String>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{key}: {e}")),
        Err(_) => Ok(None),
    }
}

fn parse_recipe(raw: &str) -> Result<Supply, String> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("LFG_RECIPE: {e}"))?;
    match parts.as_slice() {
        [t, h, d] => Ok(Supply::new(*t, *h, *d)),
        _ => Err("LFG_RECIPE must be three comma-separated counts".into()),
    }
}
