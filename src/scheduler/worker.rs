//! Scheduler worker and job table.
//!
//! # Responsibilities
//! - Own the table of periodic jobs
//! - Run the polling loop while started
//! - Dispatch due jobs onto independent blocking tasks

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::lifecycle::shutdown::{clamp_stop_timeout, Shutdown};
use crate::observability::metrics;
use crate::registry::error::StatusError;
use crate::scheduler::job::{Job, JobHandle, JobTask};

/// Resolution of the polling loop.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic job scheduler.
///
/// Cloning yields another handle to the same job table and worker.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

#[derive(Default)]
struct SchedulerInner {
    jobs: Mutex<HashMap<JobHandle, Job>>,
    next_id: AtomicU64,
    worker: Mutex<Option<Worker>>,
}

/// A running polling loop.
struct Worker {
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job whose first run is one interval from now.
    pub(crate) fn schedule(&self, label: String, interval: Duration, task: JobTask) -> JobHandle {
        let handle = JobHandle(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let mut jobs = lock(&self.inner.jobs);
        tracing::debug!(job = %handle, path = %label, interval_secs = interval.as_secs(), "Job scheduled");
        jobs.insert(handle, Job::new(label, interval, task, Instant::now()));
        metrics::record_jobs(jobs.len());
        handle
    }

    /// Remove a job from the due-set. Returns false if it was unknown.
    ///
    /// A run already in flight is allowed to finish.
    pub fn cancel(&self, handle: JobHandle) -> bool {
        let mut jobs = lock(&self.inner.jobs);
        let removed = jobs.remove(&handle);
        metrics::record_jobs(jobs.len());
        match removed {
            Some(job) => {
                tracing::debug!(job = %handle, path = %job.label, "Job cancelled");
                true
            }
            None => false,
        }
    }

    pub fn job_count(&self) -> usize {
        lock(&self.inner.jobs).len()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.worker)
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }

    /// Start the polling loop on the current tokio runtime.
    ///
    /// Returns `Ok(false)` if a worker is already running.
    pub fn start(&self) -> Result<bool, StatusError> {
        let mut worker = lock(&self.inner.worker);
        if worker
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
        {
            tracing::debug!("Scheduler already running");
            return Ok(false);
        }

        let runtime = Handle::try_current().map_err(|_| StatusError::NoRuntime)?;
        let shutdown = Shutdown::new();
        let handle = runtime.spawn(poll_loop(Arc::downgrade(&self.inner), shutdown.subscribe()));
        *worker = Some(Worker { shutdown, handle });

        tracing::info!(poll_interval_ms = POLL_INTERVAL.as_millis() as u64, "Scheduler started");
        Ok(true)
    }

    /// Ask the polling loop to exit and wait up to `timeout_secs` for it.
    ///
    /// The timeout is clamped to [0, 600] seconds. On expiry the worker is
    /// left to finish on its own. Job bindings are kept.
    pub async fn stop(&self, timeout_secs: u64) {
        let worker = lock(&self.inner.worker).take();
        let Some(worker) = worker else {
            tracing::debug!("Scheduler not running");
            return;
        };

        worker.shutdown.trigger();
        let timeout = clamp_stop_timeout(timeout_secs);
        match time::timeout(timeout, worker.handle).await {
            Ok(Ok(())) => tracing::info!("Scheduler stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Scheduler worker ended abnormally"),
            Err(_) => tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Scheduler worker did not stop in time, detaching"
            ),
        }
    }
}

impl SchedulerInner {
    /// Collect the tasks of every due job and push their next run forward.
    fn take_due(&self, now: Instant) -> Vec<(JobHandle, String, JobTask)> {
        let mut jobs = lock(&self.jobs);
        jobs.iter_mut()
            .filter(|(_, job)| job.is_due(now))
            .map(|(handle, job)| {
                job.reschedule(now);
                (*handle, job.label.clone(), Arc::clone(&job.task))
            })
            .collect()
    }
}

async fn poll_loop(inner: Weak<SchedulerInner>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(scheduler) = inner.upgrade() else {
                    tracing::debug!("Scheduler dropped, exiting loop");
                    break;
                };
                for (handle, label, task) in scheduler.take_due(Instant::now()) {
                    dispatch(handle, label, task);
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Scheduler received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

/// Run one job off the polling loop. A panic is logged and contained.
fn dispatch(handle: JobHandle, label: String, task: JobTask) {
    tokio::spawn(async move {
        if let Err(e) = tokio::task::spawn_blocking(move || task()).await {
            tracing::error!(job = %handle, path = %label, error = %e, "Refresh job panicked");
        }
    });
}
