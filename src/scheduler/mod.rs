//! Background refresh scheduler.
//!
//! # Data Flow
//! ```text
//! Registry::set_dynamic
//!     → job.rs (Job bound to a path, interval, refresh task)
//!     → worker.rs (job table)
//!
//! Polling loop (worker.rs), once per second:
//!     → pick due jobs, push their next due time forward
//!     → run each task on the blocking pool
//!     → task writes its result back through the Registry
//! ```
//!
//! # State Machine
//! ```text
//! Idle --start()--> Running --stop(timeout)--> Idle
//! ```
//!
//! # Design Decisions
//! - Stopping pauses execution only; job bindings survive a stop
//! - Each due job runs on its own blocking task, so a slow refresh never
//!   delays the due-checks of other jobs
//! - Cancelling a job does not preempt a run already in flight
//! - No per-job exclusion: a job slower than its interval can overlap itself

pub mod job;
pub mod worker;

pub use job::{clamp_interval, JobHandle, RefreshError, RefreshFn};
pub use worker::{Scheduler, POLL_INTERVAL};
