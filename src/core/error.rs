//! Error types for scheduler operations.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;

/// Errors produced while setting up or running a simulation.
///
/// Broken invariants inside the core are not represented here; they abort the
/// process via [`abort_on_panic`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration was rejected before the run started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A thread or runtime could not be created.
    #[error("spawn failed: {0}")]
    Spawn(String),
    /// The scheduler thread terminated by panicking.
    #[error("scheduler thread panicked")]
    SchedulerPanicked,
    /// The async runtime failed while driving the run.
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

/// Run `f`, aborting the whole process if it panics.
///
/// Used on the scheduler thread and, through [`AbortOnPanic`], for occupancy tasks, where an unwound panic
/// would leave the coordinator waiting for a quiescence that never comes.
pub(crate) fn abort_on_panic<R>(context: &'static str, f: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!(context, "run invariant violated; aborting");
            std::process::abort()
        }
    }
}

/// Future adapter that applies [`abort_on_panic`] to every poll of the inner future.
///
/// A panic anywhere in an occupancy task, including inside the timer, must not be
/// swallowed by the executor.
pub(crate) struct AbortOnPanic {
    context: &'static str,
    inner: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl AbortOnPanic {
    pub(crate) fn new(
        context: &'static str,
        fut: impl Future<Output = ()> + Send + 'static,
    ) -> Self {
        Self {
            context,
            inner: Box::pin(fut),
        }
    }
}

impl Future for AbortOnPanic {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let context = self.context;
        let inner = self.inner.as_mut();
        abort_on_panic(context, move || inner.poll(cx))
    }
}
