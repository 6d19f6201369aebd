//! The worker pool.
//!
//! A fixed number of worker threads pull [`Job`]s from one shared queue and
//! send a [`JobResult`] back for each. The calling thread acts as the
//! coordinator:
//!
//! ```text
//!             Job (queue)                JobResult
//!  run() ──────────────────► worker 0 ─────────────┐
//!    │   └──────────────────► worker 1 ─────────────┤
//!    │   └──────────────────► worker N ─────────────┤
//!    ▼                                              ▼
//!  join all ◄──────────────────────────────── observer + Vec
//! ```
//!
//! There is no ordering between workers, only the guarantee that every job is
//! handled exactly once. A worker that actually downloaded something rests
//! for the [`Throttle`] cooldown before taking its next job; the limit is per
//! worker, not global.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use crate::decide::{decide, JobResult};
use crate::error::DispatchError;
use crate::fetch::Fetcher;
use crate::job::Job;

/// Worker threads used when `-w` is not given.
pub const DEFAULT_WORKERS: usize = 5;

/// How long a worker rests after a download when `--cooldown` is not given.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Per-worker pause after a completed download.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    cooldown: Duration,
}

impl Throttle {
    /// A zero `cooldown` disables throttling.
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Block the calling worker if `result` was a real download.
    /// Skips and failures never wait.
    pub fn after(&self, result: &JobResult) {
        if result.downloaded && !self.cooldown.is_zero() {
            trace!(cooldown = ?self.cooldown, "cooling down");
            thread::sleep(self.cooldown);
        }
    }
}

/// Fixed-size pool of download workers.
///
/// Threads are scoped to a single [`Dispatcher::run`] call, so nothing
/// outlives it and the fetcher only has to be borrowed.
///
/// ## For contributors
///
/// Workers must never propagate errors: everything a job can hit is folded
/// into its [`JobResult`] by [`decide`]. A panic is the only way a worker
/// stops early, and `run` reports it after the rest of the queue drains.
pub struct Dispatcher {
    workers: usize,
    throttle: Throttle,
}

impl Dispatcher {
    /// `workers` is clamped to at least one.
    pub fn new(workers: usize, cooldown: Duration) -> Self {
        Self {
            workers: workers.max(1),
            throttle: Throttle::new(cooldown),
        }
    }

    /// Effective worker count after clamping.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process every job and return one result per job.
    ///
    /// `observer` runs on the calling thread as results arrive, in completion
    /// order. Returns only after every worker has exited. If a worker panics
    /// the remaining ones still drain the queue, then
    /// [`DispatchError::WorkerPanicked`] is returned.
    pub fn run<F>(
        &self,
        jobs: Vec<Job>,
        fetcher: &dyn Fetcher,
        mut observer: F,
    ) -> Result<Vec<JobResult>, DispatchError>
    where
        F: FnMut(&JobResult),
    {
        let total = jobs.len();
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let job_rx = Mutex::new(job_rx);
        let (result_tx, result_rx) = mpsc::channel::<JobResult>();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker| {
                    let queue = &job_rx;
                    let results = result_tx.clone();
                    let throttle = self.throttle;
                    scope.spawn(move || work(worker, queue, results, fetcher, throttle))
                })
                .collect();
            // Workers hold the only senders now, so the result loop below
            // ends once the last of them exits.
            drop(result_tx);

            for job in jobs {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            drop(job_tx);

            let mut collected = Vec::with_capacity(total);
            for result in result_rx {
                observer(&result);
                collected.push(result);
            }

            let panicked = handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count();

            if panicked > 0 {
                Err(DispatchError::WorkerPanicked)
            } else {
                Ok(collected)
            }
        })
    }
}

fn work(
    worker: usize,
    queue: &Mutex<Receiver<Job>>,
    results: Sender<JobResult>,
    fetcher: &dyn Fetcher,
    throttle: Throttle,
) {
    loop {
        // The lock is released before the job runs.
        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).recv();
        let Ok(job) = next else {
            break;
        };

        debug!(worker, job = job.id, title = %job.item.title, "processing");
        let result = decide(&job, fetcher);
        if results.send(result.clone()).is_err() {
            break;
        }
        throttle.after(&result);
    }
    trace!(worker, "queue drained");
}
