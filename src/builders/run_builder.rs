//! Build a coordinator from a `RunConfig`.

use std::sync::Arc;

use crate::config::RunConfig;
use crate::core::{
    Coordinator, DurationSource, InstancePool, ReportSink, RunContext, RunState, SchedulerError,
    Spawn, SupplyLedger, TracingReportSink, UniformDurations,
};

/// Assembles a run from configuration plus optional collaborators.
///
/// Defaults: `TracingReportSink`, and `UniformDurations` over the configured range
/// (seeded when the config carries a seed).
pub struct RunBuilder {
    config: RunConfig,
    sink: Option<Arc<dyn ReportSink>>,
    durations: Option<Arc<dyn DurationSource>>,
}

impl RunBuilder {
    /// Start from a config. It is normalized and validated in [`build`](Self::build).
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            sink: None,
            durations: None,
        }
    }

    /// Config as given.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Report to `sink` instead of tracing.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Draw durations from `durations` instead of the configured range.
    #[must_use]
    pub fn with_durations(mut self, durations: Arc<dyn DurationSource>) -> Self {
        self.durations = Some(durations);
        self
    }

    /// Validate and produce the shared context.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` when validation fails.
    pub fn build_context(self) -> Result<RunContext, SchedulerError> {
        let config = self.config.normalized();
        config
            .validate()
            .map_err(|e| SchedulerError::InvalidConfig(format!("config invalid: {e}")))?;

        let ledger = SupplyLedger::new(config.supply, config.recipe).ok_or_else(|| {
            SchedulerError::InvalidConfig("recipe must be positive in every role".into())
        })?;
        let pool = InstancePool::new(config.instances);

        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingReportSink));
        let durations = self.durations.unwrap_or_else(|| match config.seed {
            Some(seed) => Arc::new(UniformDurations::seeded(config.durations, seed)),
            None => Arc::new(UniformDurations::new(config.durations)),
        });

        Ok(RunContext::new(
            RunState::new(ledger, pool),
            sink,
            durations,
            config.time_unit(),
        ))
    }

    /// Validate and produce a coordinator that spawns occupancy tasks on `spawner`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` when validation fails.
    pub fn build<S>(self, spawner: S) -> Result<Coordinator<S>, SchedulerError>
    where
        S: Spawn + Clone + Send + 'static,
    {
        Ok(Coordinator::new(Arc::new(self.build_context()?), spawner))
    }
}

impl std::fmt::Debug for RunBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunBuilder")
            .field("config", &self.config)
            .field("custom_sink", &self.sink.is_some())
            .field("custom_durations", &self.durations.is_some())
            .finish()
    }
}
