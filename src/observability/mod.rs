//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry, scheduler and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metric calls are no-ops until a recorder is installed
//! - Logging init never panics when a subscriber already exists

pub mod logging;
pub mod metrics;
