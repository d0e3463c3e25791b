//! Bounded worker pool for blocking detection work.
//!
//! At most `workers` requests run at once, each on its own blocking thread.
//! Later requests wait on the semaphore in arrival order. A deadline abandons
//! the response but does not interrupt an oracle call already in flight; the
//! worker slot stays taken until that call returns.

use crate::util::{SymScanError, SymScanResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Semaphore-gated `spawn_blocking` pool.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl WorkerPool {
    /// Creates a pool with `workers` slots (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers.max(1))),
            timeout: None,
        }
    }

    /// Sets a deadline covering queueing and execution.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the number of idle worker slots.
    pub fn idle(&self) -> usize {
        self.permits.available_permits()
    }

    /// Runs `job` on a worker once a slot frees up.
    ///
    /// A panicking job is reported as [`SymScanError::Internal`]; the pool
    /// keeps serving.
    pub async fn run<T, F>(&self, operation: &'static str, job: F) -> SymScanResult<T>
    where
        F: FnOnce() -> SymScanResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let work = self.acquire_and_run(operation, job);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| {
                SymScanError::DeadlineExceeded {
                    operation,
                    timeout_ms: limit.as_millis() as u64,
                }
            })?,
            None => work.await,
        }
    }

    async fn acquire_and_run<T, F>(&self, operation: &'static str, job: F) -> SymScanResult<T>
    where
        F: FnOnce() -> SymScanResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| SymScanError::Internal("worker pool is closed".to_string()))?;

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        });
        handle
            .await
            .map_err(|err| SymScanError::Internal(format!("{operation} worker failed: {err}")))?
    }
}
