//! Fixed-size pool of tokio workers with index-ordered result collection.

use std::{future::Future, sync::Arc};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `handler` over every job on at most `size` concurrent workers.
    ///
    /// Results come back in submission order regardless of completion order.
    /// A slot is `None` only when the job itself panicked.
    pub async fn run<J, R, F, Fut>(&self, jobs: Vec<J>, handler: F) -> Vec<Option<R>>
    where
        J: Send + 'static,
        R: Send + 'static,
        F: Fn(usize, J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let (job_tx, job_rx) = mpsc::channel::<(usize, J)>(total);
        for (index, job) in jobs.into_iter().enumerate() {
            // capacity == total, never blocks
            let _ = job_tx.send((index, job)).await;
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let handler = Arc::new(handler);
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(usize, R)>();

        let worker_count = self.size.min(total);
        debug!(workers = worker_count, jobs = total, "starting worker pool");

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let job_rx = Arc::clone(&job_rx);
            let handler = Arc::clone(&handler);
            let result_tx = result_tx.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = job_rx.lock().await.recv().await;
                    let Some((index, job)) = next else {
                        break;
                    };
                    // A panicking job only loses its own slot.
                    let result = match tokio::spawn(handler(index, job)).await {
                        Ok(result) => result,
                        Err(e) => {
                            warn!(worker_id, index, error = %e, "job failed");
                            continue;
                        }
                    };
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
                debug!(worker_id, "worker drained");
            }));
        }
        drop(result_tx);

        let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
        while let Some((index, result)) = result_rx.recv().await {
            slots[index] = Some(result);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "worker task failed");
            }
        }

        slots
    }
}
