//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every section has defaults so an empty file is a valid config.

use serde::{Deserialize, Serialize};

use crate::http::DEFAULT_BIND_ADDRESS;

/// Root configuration for the status service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StatusConfig {
    /// HTTP endpoint settings.
    pub server: ServerConfig,

    /// Background refresh settings.
    pub scheduler: SchedulerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Entries the binary publishes about itself.
    pub builtin: BuiltinConfig,

    /// Static entries seeded at startup.
    pub entries: Vec<EntryConfig>,
}

/// HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8180").
    pub bind_address: String,

    /// How long to wait for in-flight requests on shutdown.
    pub stop_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            stop_timeout_secs: 60,
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Run dynamic entries in the background.
    /// When disabled, dynamic entries only hold their warm-up value.
    pub enabled: bool,

    /// How long to wait for the polling loop on shutdown.
    pub stop_timeout_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stop_timeout_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9180".to_string(),
        }
    }
}

/// Version string published by the binary.
pub const BUILTIN_VERSION: &str = "app.version";
/// Unix start time published by the binary.
pub const BUILTIN_STARTED_AT: &str = "app.started_at";
/// Dynamic uptime entry published by the binary.
pub const BUILTIN_UPTIME: &str = "app.uptime_secs";

/// Paths the binary publishes before and after the configured entries.
pub const BUILTIN_PATHS: [&str; 3] = [BUILTIN_VERSION, BUILTIN_STARTED_AT, BUILTIN_UPTIME];

/// Built-in entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuiltinConfig {
    /// Refresh interval of the uptime entry.
    pub uptime_interval_secs: u64,
}

impl Default for BuiltinConfig {
    fn default() -> Self {
        Self {
            uptime_interval_secs: 10,
        }
    }
}

/// A static entry given in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryConfig {
    /// Dot-path of the entry (e.g., "service.region").
    pub name: String,

    /// String, number, boolean or array of those.
    pub value: serde_json::Value,
}
