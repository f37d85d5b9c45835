//! Registry and scheduler error definitions.

use thiserror::Error;

/// Errors raised synchronously by registry and scheduler operations.
///
/// A missing path is never an error: `Registry::delete` reports it as
/// `Ok(false)` and `Registry::get` substitutes the caller's default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// The dot-path was empty or contained an empty segment.
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// The value is not one of the storable kinds.
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// A deeper path was requested under an existing value leaf.
    #[error("Invalid nesting of values under: {prefix}")]
    NestingConflict { prefix: String },

    /// A value was requested at a path that already has sub entries.
    #[error("Name has sub entries: {path}")]
    LeafConflict { path: String },

    /// An interior node was deleted without requesting subtree deletion.
    #[error("Path has sub entries, subtree deletion not requested: {path}")]
    SubtreeConflict { path: String },

    /// Background work was requested outside of a tokio runtime.
    #[error("No tokio runtime available to run background work")]
    NoRuntime,
}
