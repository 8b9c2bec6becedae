//! Party formation, instance scheduling and quiescence detection.

pub mod context;
pub mod coordinator;
pub mod duration;
pub mod error;
pub mod instance;
pub mod ledger;
pub mod occupancy;
pub mod quiescence;
pub mod report;
pub mod scheduler;

pub use context::{RunContext, RunState};
pub use coordinator::Coordinator;
pub use duration::{DurationSource, UniformDurations};
pub use error::{AppResult, SchedulerError};
pub use instance::{Instance, InstanceId, InstancePool, InstanceState};
pub use ledger::{Supply, SupplyLedger};
pub use occupancy::{OccupancyTask, Spawn};
pub use report::{
    ChannelReportSink, InMemoryReportSink, InstanceSnapshot, ReportSink, RunEvent, RunSummary,
    StateSnapshot, TracingReportSink,
};
pub use scheduler::Scheduler;
