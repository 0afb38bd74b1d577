//! Bounded worker pool
//!
//! Units of work are spawned onto the Tokio runtime immediately, but each
//! one waits for a permit before running, so at most `width` units execute
//! at any time. [`WorkerPool::drain`] is the phase barrier: it returns once
//! every unit submitted so far has finished, after which the pool can take
//! a new wave of work.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub struct WorkerPool {
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
    width: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `width` units at once (minimum 1)
    pub fn new(width: usize) -> Self {
        let width = width.max(1);
        Self {
            permits: Arc::new(Semaphore::new(width)),
            tasks: JoinSet::new(),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of submitted units that have not been drained yet
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Enqueues a unit of work
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit<F>(&mut self, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only fails if the
            // pool itself is gone.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            unit.await;
        });
    }

    /// Waits until every submitted unit has completed
    ///
    /// A unit that panics is logged and counted as finished; it does not
    /// take the barrier down with it.
    ///
    /// # Returns
    ///
    /// The number of units that completed since the last drain
    pub async fn drain(&mut self) -> usize {
        let mut completed = 0;
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task aborted: {}", e);
            }
            completed += 1;
        }
        completed
    }
}
