//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StatusConfig (validated, immutable)
//!     → main.rs seeds the registry and starts subsystems
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Seeded entries are checked with the same rules the registry applies

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BuiltinConfig, EntryConfig, ObservabilityConfig, SchedulerConfig, ServerConfig, StatusConfig,
    BUILTIN_PATHS, BUILTIN_STARTED_AT, BUILTIN_UPTIME, BUILTIN_VERSION,
};
pub use validation::{validate_config, ValidationError};
