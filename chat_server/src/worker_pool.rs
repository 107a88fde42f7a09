//! Bounded pool for work that must not run on a connection's receive loop.
//!
//! A fixed number of worker threads pull jobs from a bounded `crossbeam_channel` queue.
//! [`WorkerPool::run`] enqueues a closure and waits for its value on a one-shot reply
//! channel; when the queue is full the caller waits for room. The number of workers
//! caps how many exchange commands are aggregated at once across the whole server.
//!
//! A job that panics is contained: the worker logs it and keeps serving, and the
//! submitting caller gets [`ChatError::WorkerPool`]. Dropping the pool closes the queue
//! and joins the workers after they finish what is already queued.

use chat_common::{ChatError, Result};
use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, error};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

/// Default number of queued jobs before submitters have to wait.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size thread pool fed by a bounded queue.
pub struct WorkerPool {
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one) behind a queue of `queue_capacity` jobs.
    pub fn new(size: usize, queue_capacity: usize) -> Result<Self> {
        let (tx, rx) = bounded::<Job>(queue_capacity);
        let workers = (0..size.max(1))
            .map(|index| {
                let rx = rx.clone();
                thread::Builder::new()
                    .name(format!("offload-{}", index))
                    .spawn(move || worker_loop(rx))
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        debug!("Worker pool started with {} workers", workers.len());

        Ok(Self {
            jobs: Some(tx),
            workers,
        })
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Run `job` on a worker and wait for its result.
    pub fn run<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| ChatError::WorkerPool("pool is shut down".to_string()))?;

        let (reply_tx, reply_rx) = bounded::<T>(1);
        let wrapped: Job = Box::new(move || {
            let _ = reply_tx.send(job());
        });
        jobs.send(wrapped)
            .map_err(|e| ChatError::ChannelSend(e.to_string()))?;

        reply_rx
            .recv()
            .map_err(|_| ChatError::WorkerPool("job ended without a result".to_string()))
    }
}

fn worker_loop(rx: Receiver<Job>) {
    for job in rx.iter() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(
                "Offloaded job panicked on {}",
                thread::current().name().unwrap_or("worker")
            );
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn returns_job_result() {
        let pool = WorkerPool::new(2, 4).unwrap();
        assert_eq!(pool.run(|| 6 * 7).unwrap(), 42);
    }

    #[test]
    fn zero_size_still_has_a_worker() {
        let pool = WorkerPool::new(0, 1).unwrap();
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.run(|| "done").unwrap(), "done");
    }

    #[test]
    fn concurrency_is_bounded_by_size() {
        let pool = Arc::new(WorkerPool::new(2, 16).unwrap());
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let callers: Vec<_> = (0..6)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    pool.run(move || {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(30));
                        running.fetch_sub(1, Ordering::SeqCst);
                    })
                    .unwrap();
                })
            })
            .collect();
        for caller in callers {
            caller.join().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn panicking_job_is_reported_and_worker_survives() {
        let pool = WorkerPool::new(1, 1).unwrap();

        let failed = pool.run(|| -> u32 { panic!("boom") });
        assert!(matches!(failed, Err(ChatError::WorkerPool(_))));

        assert_eq!(pool.run(|| 1u32).unwrap(), 1);
    }
}
