//! Metrics collection and exposition.
//!
//! # Metrics
//! - `status_refresh_total` (counter): refresh runs by path, outcome
//! - `status_refresh_duration_seconds` (histogram): refresh latency by path
//! - `status_entries` (gauge): value leaves in the registry
//! - `status_jobs` (gauge): scheduled refresh jobs
//! - `status_export_bytes` (histogram): size of exported documents

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_refresh(path: &str, outcome: &'static str, elapsed: Duration) {
    counter!("status_refresh_total", "path" => path.to_string(), "outcome" => outcome).increment(1);
    histogram!("status_refresh_duration_seconds", "path" => path.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_entries(count: usize) {
    gauge!("status_entries").set(count as f64);
}

pub fn record_jobs(count: usize) {
    gauge!("status_jobs").set(count as f64);
}

pub fn record_export(bytes: usize) {
    histogram!("status_export_bytes").record(bytes as f64);
}
