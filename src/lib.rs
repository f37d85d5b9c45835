//! Process-local application status registry.
//!
//! A thread-safe tree of status values addressed by dot-paths, with entries
//! that are either set directly or recomputed on a schedule, exported as
//! JSON over a minimal HTTP endpoint.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod scheduler;

pub use config::StatusConfig;
pub use http::{ServerHandle, StatusServer};
pub use lifecycle::Shutdown;
pub use registry::{Node, Registry, StatusError, StatusPath, StatusValue};
pub use scheduler::{JobHandle, RefreshError, Scheduler};
