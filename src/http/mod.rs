//! HTTP exposure of the status registry.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, trace layer)
//!     → GET /        → Registry::export() → 200 application/json
//!     → anything else → 405
//! ```
//!
//! # Design Decisions
//! - Read-only: the endpoint never mutates the registry
//! - No authentication; bind to loopback unless exposed deliberately
//! - Server lifecycle is independent of the scheduler's

pub mod server;

pub use server::{ServerHandle, StatusServer, DEFAULT_BIND_ADDRESS};
