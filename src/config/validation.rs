//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse and timeouts are in range
//! - Check seeded entries would be accepted by the registry alongside
//!   the built-in ones
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: StatusConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{StatusConfig, BUILTIN_PATHS};
use crate::lifecycle::shutdown::MAX_STOP_TIMEOUT_SECS;
use crate::registry::{PathTree, StatusError, StatusPath, StatusValue};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),

    #[error("{field} of {value}s exceeds the maximum of {max}s", max = MAX_STOP_TIMEOUT_SECS)]
    TimeoutTooLarge { field: &'static str, value: u64 },

    #[error("entry {name:?}: {source}")]
    InvalidEntry { name: String, source: StatusError },
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &StatusConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    for (field, value) in [
        ("server.stop_timeout_secs", config.server.stop_timeout_secs),
        ("scheduler.stop_timeout_secs", config.scheduler.stop_timeout_secs),
    ] {
        if value > MAX_STOP_TIMEOUT_SECS {
            errors.push(ValidationError::TimeoutTooLarge { field, value });
        }
    }

    // Replay the entries on a scratch tree holding the built-in paths, to
    // catch nesting conflicts as well as bad names and values.
    let mut tree = PathTree::new();
    for builtin in BUILTIN_PATHS {
        let seeded = StatusPath::parse(builtin).and_then(|path| tree.set(&path, StatusValue::Null));
        if let Err(source) = seeded {
            errors.push(ValidationError::InvalidEntry {
                name: builtin.to_string(),
                source,
            });
        }
    }
    for entry in &config.entries {
        let applied = StatusPath::parse(&entry.name).and_then(|path| {
            let value = StatusValue::try_from(entry.value.clone())?;
            tree.set(&path, value)
        });
        if let Err(source) = applied {
            errors.push(ValidationError::InvalidEntry {
                name: entry.name.clone(),
                source,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
