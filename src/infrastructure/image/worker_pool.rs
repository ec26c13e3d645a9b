//! Bounded pool for image pipeline jobs.
//!
//! A dispatcher task owns a FIFO queue and only spawns a job once it holds a
//! permit, so a burst of requests queues instead of fanning out.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tracing::{debug, error, trace};

/// Default number of concurrent jobs.
pub const DEFAULT_MAX_WORKERS: usize = 4;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Handle to a bounded job pool. Cheap to clone.
///
/// Must be created inside a Tokio runtime.
#[derive(Clone)]
pub struct WorkerPool {
    job_tx: mpsc::UnboundedSender<Job>,
    counters: Arc<PoolCounters>,
    max_workers: usize,
}

#[derive(Default)]
struct PoolCounters {
    queued: AtomicUsize,
    active: AtomicUsize,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_workers", &self.max_workers)
            .field("queued", &self.queued())
            .field("active", &self.active())
            .finish()
    }
}

/// Holds a worker slot for one running job. Released on drop, so a
/// panicking job still frees its permit and leaves the counters consistent.
struct ActiveSlot {
    counters: Arc<PoolCounters>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// State for the dispatcher loop.
struct DispatcherState {
    job_rx: mpsc::UnboundedReceiver<Job>,
    semaphore: Arc<Semaphore>,
    counters: Arc<PoolCounters>,
}

impl WorkerPool {
    /// Creates a pool running at most `max_workers` jobs at once.
    /// Zero is treated as one.
    #[must_use]
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let counters = Arc::new(PoolCounters::default());

        let state = DispatcherState {
            job_rx,
            semaphore: Arc::new(Semaphore::new(max_workers)),
            counters: counters.clone(),
        };
        tokio::spawn(Self::run_dispatcher(state));

        debug!(max_workers, "Worker pool started");

        Self {
            job_tx,
            counters,
            max_workers,
        }
    }

    /// Queues `job`. Never blocks.
    pub fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.counters.queued.fetch_add(1, Ordering::SeqCst);
        if self.job_tx.send(Box::pin(job)).is_err() {
            self.counters.queued.fetch_sub(1, Ordering::SeqCst);
            error!("Worker pool dispatcher is gone, dropping job");
        }
    }

    /// Maximum number of concurrent jobs.
    #[must_use]
    pub const fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Jobs waiting for a free worker.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.counters.queued.load(Ordering::SeqCst)
    }

    /// Jobs currently running.
    #[must_use]
    pub fn active(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }

    async fn run_dispatcher(mut state: DispatcherState) {
        let mut queue: VecDeque<Job> = VecDeque::new();
        let mut closed = false;

        loop {
            if closed && queue.is_empty() {
                break;
            }

            tokio::select! {
                job = state.job_rx.recv(), if !closed => {
                    match job {
                        Some(job) => queue.push_back(job),
                        None => closed = true,
                    }
                }
                Ok(permit) = state.semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                    if let Some(job) = queue.pop_front() {
                        state.counters.queued.fetch_sub(1, Ordering::SeqCst);
                        state.counters.active.fetch_add(1, Ordering::SeqCst);
                        let slot = ActiveSlot {
                            counters: state.counters.clone(),
                            _permit: permit,
                        };

                        tokio::spawn(async move {
                            let _slot = slot;
                            job.await;
                        });
                    }
                }
            }
        }

        trace!("Worker pool dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_runs_submitted_jobs() {
        let pool = WorkerPool::new(2);
        let (tx, mut rx) = mpsc::unbounded_channel();

        for i in 0..5 {
            let tx = tx.clone();
            pool.submit(async move {
                let _ = tx.send(i);
            });
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(i) = rx.recv().await {
            seen.push(i);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        for _ in 0..8 {
            let running = running.clone();
            let peak = peak.clone();
            let done_tx = done_tx.clone();
            pool.submit(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                let _ = done_tx.send(());
            });
        }
        drop(done_tx);

        let mut finished = 0;
        while done_rx.recv().await.is_some() {
            finished += 1;
        }

        assert_eq!(finished, 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.max_workers(), 2);
    }

    #[tokio::test]
    async fn test_zero_workers_treated_as_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.max_workers(), 1);

        let (tx, rx) = tokio::sync::oneshot::channel();
        pool.submit(async move {
            let _ = tx.send(42);
        });
        assert_eq!(rx.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_panicking_job_frees_its_worker() {
        let pool = WorkerPool::new(1);
        pool.submit(async {
            panic!("job exploded");
        });

        let (tx, rx) = tokio::sync::oneshot::channel();
        pool.submit(async move {
            let _ = tx.send(());
        });

        tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .unwrap()
            .unwrap();

        for _ in 0..50 {
            if pool.active() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pool.active(), 0);
        assert_eq!(pool.queued(), 0);
    }
}
