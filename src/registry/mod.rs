//! Status registry subsystem.
//!
//! # Data Flow
//! ```text
//! "a.b.c" (external name)
//!     → path.rs (StatusPath, validated segments)
//!     → store.rs (Registry: lock, job map)
//!     → tree.rs (PathTree: walk, create, conflict checks)
//!     → value.rs (StatusValue leaves)
//!
//! Registry::export
//!     → serde_json over the whole tree → JSON string
//! ```
//!
//! # Design Decisions
//! - A path is either a value leaf or an interior, never both
//! - Tree edits and job-map edits share one lock acquisition
//! - Missing paths are not errors: `get` substitutes, `delete` returns false

pub mod error;
pub mod path;
pub mod store;
pub mod tree;
pub mod value;

pub use error::StatusError;
pub use path::StatusPath;
pub use store::Registry;
pub use tree::{Node, PathTree};
pub use value::StatusValue;
