//! Tokio runtime spawner implementation.

use std::future::Future;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Handle, Runtime};

use crate::core::{SchedulerError, Spawn};

/// Tokio-based spawner that executes occupancy tasks on a tokio runtime.
///
/// Either borrows an existing runtime through its handle, or owns a runtime that
/// lives as long as the last clone of the spawner.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: Handle,
    _runtime: Option<Arc<Runtime>>,
}

impl TokioSpawner {
    /// Spawn onto an existing runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Runtime`] if the runtime was built without
    /// `enable_time`, since every occupancy task sleeps on the timer.
    pub fn new(handle: Handle) -> Result<Self, SchedulerError> {
        if !has_timer(&handle) {
            return Err(SchedulerError::Runtime(
                "runtime has timers disabled; build it with enable_time()".into(),
            ));
        }
        Ok(Self {
            handle,
            _runtime: None,
        })
    }

    /// Create and own a multi-threaded runtime with `worker_threads` workers.
    ///
    /// The runtime must be dropped outside async context, so keep the last clone
    /// on a plain thread.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from building the runtime.
    pub fn with_worker_threads(worker_threads: usize) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("lfg-occupancy")
            .enable_time()
            .build()?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _runtime: Some(Arc::new(runtime)),
        })
    }

    /// Handle of the runtime tasks are spawned on.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// Whether sleeps can be created on `handle`. Tokio panics at construction otherwise.
fn has_timer(handle: &Handle) -> bool {
    let _entered = handle.enter();
    panic::catch_unwind(|| drop(tokio::time::sleep(Duration::ZERO))).is_ok()
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
