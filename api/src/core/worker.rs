//! Background review worker.
//!
//! Every accepted webhook delivery becomes one task on the worker. Tasks are
//! tracked so shutdown can wait for them, and a semaphore caps how many run at
//! once; the rest wait for a permit.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug, Clone)]
pub struct ReviewWorker {
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
}

impl ReviewWorker {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Schedules `job`; returns immediately.
    pub fn spawn<F>(&self, kind: &'static str, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        let span = info_span!("review_task", kind);
        self.tracker.spawn(
            async move {
                // acquire fails only once the semaphore is closed
                let Ok(_permit) = permits.acquire_owned().await else {
                    warn!("worker: permits closed, dropping task");
                    return;
                };
                debug!("worker: task started");
                job.await;
            }
            .instrument(span),
        );
    }

    /// Tasks spawned and not yet finished (running or waiting for a permit).
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Closes the tracker and waits for every task.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// [`drain`](Self::drain) bounded by `grace`. Returns `false` on timeout.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        let pending = self.in_flight();
        info!(pending, grace_secs = grace.as_secs(), "worker: draining review tasks");
        match tokio::time::timeout(grace, self.drain()).await {
            Ok(()) => {
                info!("worker: all review tasks finished");
                true
            }
            Err(_) => {
                warn!(pending = self.in_flight(), "worker: grace period elapsed, abandoning tasks");
                false
            }
        }
    }
}
