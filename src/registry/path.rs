//! Dot-path parsing.

use std::fmt;
use std::str::FromStr;

use crate::registry::error::StatusError;

/// A parsed dot-path such as `service.db.latency_ms`.
///
/// Always holds at least one segment and no segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusPath {
    segments: Vec<String>,
}

impl StatusPath {
    /// Parse an external dot-notation name.
    pub fn parse(name: &str) -> Result<Self, StatusError> {
        if name.is_empty() {
            return Err(StatusError::InvalidPath(name.to_string()));
        }

        let segments: Vec<String> = name.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(StatusError::InvalidPath(name.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dot form of the first `len` segments.
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }

    /// Path of a direct child of this path.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }
}

impl fmt::Display for StatusPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for StatusPath {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
