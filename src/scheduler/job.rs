//! Scheduled job definitions.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::registry::value::StatusValue;

/// Shortest refresh interval accepted for a dynamic entry.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Longest refresh interval; longer requests are capped, not rejected.
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// Error type returned by user refresh functions.
pub type RefreshError = Box<dyn std::error::Error + Send + Sync>;

/// A user function recomputing the value of a dynamic entry.
pub type RefreshFn = Arc<dyn Fn() -> Result<StatusValue, RefreshError> + Send + Sync>;

/// The unit of work the scheduler runs when a job is due.
pub(crate) type JobTask = Arc<dyn Fn() + Send + Sync>;

/// Identifier used to cancel a scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle(pub(crate) u64);

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Clamp a requested refresh interval into `[MIN_INTERVAL, MAX_INTERVAL]`.
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// A periodic job owned by the scheduler.
pub(crate) struct Job {
    /// Dot form of the path the job refreshes, for logs and metrics.
    pub label: String,
    pub interval: Duration,
    pub next_due: Instant,
    pub task: JobTask,
}

impl Job {
    /// Create a job whose first run is one interval from `now`.
    pub fn new(label: String, interval: Duration, task: JobTask, now: Instant) -> Self {
        Self {
            label,
            interval,
            next_due: now + interval,
            task,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    pub fn reschedule(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}
