//! The status registry.
//!
//! # Responsibilities
//! - Guard the status tree and the path → job map with one mutex
//! - Bind dynamic entries to scheduler jobs
//! - Export the whole tree as JSON
//!
//! # Design Decisions
//! - One coarse lock, held for a single tree or job-map edit only
//! - Refresh functions always run with the lock released
//! - Jobs hold a weak reference, so dropping every `Registry` handle
//!   turns pending refreshes into no-ops

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::registry::error::StatusError;
use crate::registry::path::StatusPath;
use crate::registry::tree::{Node, PathTree};
use crate::registry::value::StatusValue;
use crate::scheduler::job::{clamp_interval, JobHandle, JobTask, RefreshError, RefreshFn};
use crate::scheduler::Scheduler;

/// Thread-safe hierarchical status store.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct Registry {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<RegistryState>,
    scheduler: Scheduler,
}

#[derive(Default)]
struct RegistryState {
    tree: PathTree,
    /// Dot-path of each dynamic entry → its refresh job.
    jobs: HashMap<String, JobHandle>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The single write path shared by static sets and refresh write-backs.
    fn write(&self, path: &StatusPath, value: StatusValue) -> Result<(), StatusError> {
        value.validate()?;
        self.lock().tree.set(path, value)
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scheduler running this registry's dynamic entries.
    pub fn scheduler(&self) -> &Scheduler {
        &self.shared.scheduler
    }

    /// Set a value that is never refreshed automatically.
    ///
    /// Overwrites an existing value, including the current value of a
    /// dynamic entry (its next refresh overwrites it again).
    pub fn set_static(&self, name: &str, value: impl Into<StatusValue>) -> Result<(), StatusError> {
        let path = StatusPath::parse(name)?;
        self.shared.write(&path, value.into())
    }

    /// Like `set_static`, for untyped input such as config files.
    ///
    /// JSON objects are rejected with `UnsupportedValueType`.
    pub fn set_static_json(&self, name: &str, value: serde_json::Value) -> Result<(), StatusError> {
        let value = StatusValue::try_from(value)?;
        self.set_static(name, value)
    }

    /// Bind `name` to a refresh function run every `interval`.
    ///
    /// The interval is clamped to [1 s, 3600 s]. The entry is reset to null,
    /// then the function runs once before this returns, so the entry is
    /// populated right away; if that first run fails the entry stays null.
    /// A failed scheduled run leaves the previous value in place.
    /// Re-binding a dynamic path replaces its job.
    ///
    /// The job is registered only if `name` is still a value leaf once the
    /// first run is done. A path deleted in the meantime is re-created as
    /// null; one turned into an interior fails with `LeafConflict`.
    pub fn set_dynamic<F>(
        &self,
        name: &str,
        refresh: F,
        interval: Duration,
    ) -> Result<JobHandle, StatusError>
    where
        F: Fn() -> Result<StatusValue, RefreshError> + Send + Sync + 'static,
    {
        let path = StatusPath::parse(name)?;
        let interval = clamp_interval(interval);

        // Surface structural conflicts before any user code runs
        self.shared.write(&path, StatusValue::Null)?;

        let task = refresh_task(Arc::downgrade(&self.shared), path.clone(), Arc::new(refresh));
        task();

        let handle = {
            let mut state = self.shared.lock();
            if !matches!(state.tree.get(&path), Some(Node::Value(_))) {
                state.tree.set(&path, StatusValue::Null)?;
            }
            let handle = self
                .shared
                .scheduler
                .schedule(path.to_string(), interval, task);
            if let Some(previous) = state.jobs.insert(path.to_string(), handle) {
                self.shared.scheduler.cancel(previous);
            }
            handle
        };

        tracing::info!(path = %path, interval_secs = interval.as_secs(), job = %handle, "Dynamic entry registered");
        Ok(handle)
    }

    /// Get the value at `name`, or `default`.
    ///
    /// The default is also returned for interior nodes and for falsy
    /// values (null, false, 0, 0.0, "", []): a stored zero value cannot be
    /// told apart from a missing one here. Use `lookup` for that.
    pub fn get(&self, name: &str, default: impl Into<StatusValue>) -> StatusValue {
        let default = default.into();
        let Ok(path) = StatusPath::parse(name) else {
            return default;
        };

        match self.shared.lock().tree.get(&path) {
            Some(Node::Value(value)) if !value.is_falsy() => value.clone(),
            _ => default,
        }
    }

    /// A copy of the node at `name`, leaf or interior, without defaults.
    pub fn lookup(&self, name: &str) -> Option<Node> {
        let path = StatusPath::parse(name).ok()?;
        self.shared.lock().tree.get(&path).cloned()
    }

    /// Delete the entry at `name`.
    ///
    /// Returns `Ok(false)` when nothing is stored there. Deleting an
    /// interior requires `subtree`; every leaf removed has its refresh job
    /// cancelled under the same lock as the tree edit.
    pub fn delete(&self, name: &str, subtree: bool) -> Result<bool, StatusError> {
        let path = StatusPath::parse(name)?;

        let mut state = self.shared.lock();
        let Some(removed) = state.tree.delete(&path, subtree)? else {
            return Ok(false);
        };

        let mut cancelled = 0;
        for leaf in &removed {
            if let Some(handle) = state.jobs.remove(&leaf.to_string()) {
                self.shared.scheduler.cancel(handle);
                cancelled += 1;
            }
        }
        drop(state);

        tracing::debug!(path = %path, removed = removed.len(), cancelled, "Status entry deleted");
        Ok(true)
    }

    /// True if `name` is bound to a refresh job.
    pub fn is_dynamic(&self, name: &str) -> bool {
        self.shared.lock().jobs.contains_key(name)
    }

    /// Dot-paths of every dynamic entry, sorted.
    pub fn dynamic_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.shared.lock().jobs.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Number of value leaves.
    pub fn len(&self) -> usize {
        self.shared.lock().tree.leaf_paths().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().tree.is_empty()
    }

    /// Serialize the whole tree to JSON.
    ///
    /// Returns an empty string if serialization fails; callers decide how
    /// to report that.
    pub fn export(&self) -> String {
        let (exported, entries) = {
            let state = self.shared.lock();
            (
                serde_json::to_string(&state.tree).unwrap_or_default(),
                state.tree.leaf_paths().len(),
            )
        };
        metrics::record_entries(entries);
        metrics::record_export(exported.len());
        exported
    }

    /// Start running dynamic entries in the background.
    ///
    /// Returns `Ok(false)` if already running.
    pub fn start_background_work(&self) -> Result<bool, StatusError> {
        self.shared.scheduler.start()
    }

    /// Stop running dynamic entries, waiting up to `timeout_secs`.
    ///
    /// Bindings are kept; `start_background_work` resumes them.
    pub async fn stop_background_work(&self, timeout_secs: u64) {
        self.shared.scheduler.stop(timeout_secs).await;
    }
}

/// Build the job body for a dynamic entry: run the refresh function
/// unlocked, then write the result back.
fn refresh_task(shared: Weak<Shared>, path: StatusPath, refresh: RefreshFn) -> JobTask {
    Arc::new(move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let started = Instant::now();
        let outcome = match refresh() {
            Ok(value) => match shared.write(&path, value) {
                Ok(()) => "ok",
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Refresh result rejected");
                    "rejected"
                }
            },
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Refresh function failed");
                "failed"
            }
        };
        metrics::record_refresh(&path.to_string(), outcome, started.elapsed());
    })
}
