//! Application status service (v1)
//!
//! Serves a live status tree as JSON for dashboards and health pollers.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 APP STATUS                   │
//!                    │                                              │
//!   config.toml ─────┼─▶ config ──▶ seed entries ──┐                │
//!                    │                             ▼                │
//!                    │   ┌───────────┐  write  ┌──────────┐         │
//!                    │   │ scheduler │────────▶│ registry │         │
//!                    │   │ (1s tick) │         │  (tree)  │         │
//!                    │   └───────────┘         └────┬─────┘         │
//!                    │                              │ export        │
//!   GET /  ◀─────────┼──────────── http server ◀────┘               │
//!                    │                                              │
//!                    │   observability: tracing + metrics           │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use app_status::config::{
    load_config, StatusConfig, BUILTIN_STARTED_AT, BUILTIN_UPTIME, BUILTIN_VERSION,
};
use app_status::lifecycle::signals::wait_for_shutdown_signal;
use app_status::observability::{logging, metrics};
use app_status::{Registry, StatusServer, StatusValue};

#[derive(Parser)]
#[command(name = "app-status")]
#[command(about = "Serve live application status as JSON", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the server bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => StatusConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("app-status v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Registry::new();
    seed_registry(&registry, &config)?;

    if config.scheduler.enabled {
        registry.start_background_work()?;
    } else {
        tracing::info!("Background refresh disabled");
    }

    let server = StatusServer::new(registry.clone())
        .start(&config.server.bind_address)
        .await?;
    tracing::info!(address = %server.local_addr(), entries = registry.len(), "Serving status");

    wait_for_shutdown_signal().await;

    server.stop(config.server.stop_timeout_secs).await;
    registry
        .stop_background_work(config.scheduler.stop_timeout_secs)
        .await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Publish built-in entries and the entries listed in the config.
fn seed_registry(registry: &Registry, config: &StatusConfig) -> Result<(), Box<dyn std::error::Error>> {
    registry.set_static(BUILTIN_VERSION, env!("CARGO_PKG_VERSION"))?;

    let started_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    registry.set_static(BUILTIN_STARTED_AT, StatusValue::Int(started_at as i64))?;

    for entry in &config.entries {
        registry.set_static_json(&entry.name, entry.value.clone())?;
    }

    let started = Instant::now();
    registry.set_dynamic(
        BUILTIN_UPTIME,
        move || Ok(StatusValue::Int(started.elapsed().as_secs() as i64)),
        Duration::from_secs(config.builtin.uptime_interval_secs),
    )?;

    tracing::info!(entries = config.entries.len(), "Registry seeded");
    Ok(())
}
