//! # Dispatcher - bounded asynchronous execution of handler invocations.
//!
//! Decouples the thread calling `notify` from handler execution.
//!
//! ## Architecture
//! ```text
//! submit(job) ──► [unbounded queue] ──► drive loop
//!                                          ├─► acquire permit (worker_count permits)
//!                                          └─► running.spawn(run_once(job))
//!                                                    └─► permit released on finish
//! ```
//!
//! ## Rules
//! - `submit` never blocks and never rejects while the dispatcher is open.
//! - At most `worker_count` invocations run at once; the rest wait in the queue.
//! - Jobs start in submission order; completion order is unspecified.
//! - A failing or panicking handler only ends its own invocation.
//! - `close` stops intake; everything already queued still runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use super::runner::{Job, run_once};
use crate::reports::Bus;

/// Settings shared by every invocation spawned by one dispatcher.
#[derive(Clone)]
struct RunContext {
    bus: Bus,
    token: CancellationToken,
    timeout: Option<Duration>,
    pending: Arc<AtomicUsize>,
}

/// Worker pool executing submitted jobs on the tokio runtime.
pub struct Dispatcher<T: Send + Sync + 'static> {
    tx: RwLock<Option<mpsc::UnboundedSender<Job<T>>>>,
    driver: Mutex<Option<JoinHandle<()>>>,
    pending: Arc<AtomicUsize>,
    workers: usize,
}

impl<T: Send + Sync + 'static> Dispatcher<T> {
    /// Creates the dispatcher and spawns its drive loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        workers: usize,
        timeout: Option<Duration>,
        token: CancellationToken,
        bus: Bus,
    ) -> Self {
        let workers = workers.max(1);
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let ctx = RunContext {
            bus,
            token,
            timeout,
            pending: Arc::clone(&pending),
        };
        let semaphore = Arc::new(Semaphore::new(workers));
        let driver = tokio::spawn(drive(rx, semaphore, ctx));

        Self {
            tx: RwLock::new(Some(tx)),
            driver: Mutex::new(Some(driver)),
            pending,
            workers,
        }
    }

    /// Enqueues a job and returns immediately.
    ///
    /// Hands the job back if the dispatcher has been closed.
    pub fn submit(&self, job: Job<T>) -> Result<(), Job<T>> {
        let guard = self.tx.read().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = guard.as_ref() else {
            return Err(job);
        };

        self.pending.fetch_add(1, Ordering::AcqRel);
        tx.send(job).map_err(|e| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            e.0
        })
    }

    /// Stops accepting new jobs. Idempotent.
    pub fn close(&self) {
        self.tx
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Waits up to `grace` for every queued and running job to finish.
    ///
    /// Call after [`close`](Self::close); returns `true` once the drive loop has
    /// exited, `false` if `grace` elapsed first.
    pub async fn join(&self, grace: Duration) -> bool {
        let handle = self
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(mut handle) = handle else {
            return true;
        };

        match tokio::time::timeout(grace, &mut handle).await {
            Ok(_) => true,
            Err(_) => {
                // keep the handle so a later join can still wait for it
                *self.driver.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                false
            }
        }
    }

    /// Number of jobs queued or running.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Maximum number of concurrently running jobs.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Drains the queue, running each job once a permit is free.
async fn drive<T: Send + Sync + 'static>(
    mut rx: mpsc::UnboundedReceiver<Job<T>>,
    semaphore: Arc<Semaphore>,
    ctx: RunContext,
) {
    let mut running = JoinSet::new();

    while let Some(job) = rx.recv().await {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        while running.try_join_next().is_some() {}

        let ctx = ctx.clone();
        running.spawn(async move {
            let _permit = permit;
            run_once(job, &ctx.token, ctx.timeout, &ctx.bus).await;
            ctx.pending.fetch_sub(1, Ordering::AcqRel);
        });
    }

    while running.join_next().await.is_some() {}
}
