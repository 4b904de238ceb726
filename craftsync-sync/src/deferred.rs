//! Single-pending, coalescing delayed task.
//!
//! Scheduling while a run is already pending does nothing: the pending run
//! covers the new request too, because the job reads whatever state exists
//! when it fires rather than a snapshot from scheduling time. Scheduled runs
//! are never cancelled.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A delayed job with at most one pending run.
#[derive(Debug, Clone)]
pub struct DeferredTask {
    delay: Duration,
    pending: Arc<AtomicBool>,
    runs: Arc<AtomicU64>,
}

impl DeferredTask {
    /// Creates a task that fires `delay` after being scheduled.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(AtomicBool::new(false)),
            runs: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns true while a run is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Number of runs that have fired so far.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Acquire)
    }

    /// Schedules `job` to run after the delay on the current tokio runtime.
    ///
    /// Returns false, dropping `job`, if a run is already pending.
    pub fn schedule<F, Fut>(&self, job: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("deferred run already pending, coalescing");
            return false;
        }

        let pending = Arc::clone(&self.pending);
        let runs = Arc::clone(&self.runs);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Requests arriving while the job runs schedule a new run.
            pending.store(false, Ordering::Release);
            runs.fetch_add(1, Ordering::AcqRel);
            job().await;
        });
        true
    }
}
