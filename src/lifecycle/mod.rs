//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build registry → Start scheduler → Start server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop server → Stop scheduler (bounded wait) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Stop timeouts are clamped to [0, 600] seconds
//! - A worker that misses its stop deadline is detached, never killed

pub mod shutdown;
pub mod signals;

pub use shutdown::{clamp_stop_timeout, Shutdown, MAX_STOP_TIMEOUT_SECS};
