//! Trailing-edge debouncer for resize-triggered recomputation.

use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Collapses bursts of jobs into one run of the latest job.
///
/// Each [`Debouncer::enqueue`] replaces the pending job and restarts the
/// window; the job runs once the window elapses without another enqueue.
pub struct Debouncer {
    window: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Construct a debouncer scheduling on `runtime`.
    #[must_use]
    pub const fn new(window: Duration, runtime: Handle) -> Self {
        Self {
            window,
            runtime,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `job`, superseding any job still waiting.
    pub fn enqueue<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let window = self.window;
        let mut pending = self.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            job();
        }));
    }

    /// Drop the waiting job, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
        }
    }

    /// Returns `true` while a job is waiting for its window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Debouncer")
            .field("window", &self.window)
            .field("pending", &self.is_pending())
            .finish()
    }
}
