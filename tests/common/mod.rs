//! Shared utilities for integration tests.

use std::time::Duration;

use app_status::{Registry, StatusValue};

/// Poll `registry` until `name` holds `expected` or `timeout` elapses.
#[allow(dead_code)]
pub async fn wait_for_value(
    registry: &Registry,
    name: &str,
    expected: &StatusValue,
    timeout: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if &registry.get(name, StatusValue::Null) == expected {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Build a registry with a small nested tree and return the JSON the
/// export of that tree must parse to.
#[allow(dead_code)]
pub fn sample_registry() -> (Registry, serde_json::Value) {
    let registry = Registry::new();
    registry.set_static("service.name", "billing").unwrap();
    registry.set_static("service.instances", 3i64).unwrap();
    registry.set_static("service.healthy", true).unwrap();
    registry.set_static("queues.inbound.depth", 12i64).unwrap();
    registry.set_static("queues.outbound.depth", 0i64).unwrap();
    registry.set_static("queues.names", vec!["inbound", "outbound"]).unwrap();
    registry.set_static("scratch.value", "temporary").unwrap();
    registry.delete("scratch", true).unwrap();

    let expected = serde_json::json!({
        "service": {"name": "billing", "instances": 3, "healthy": true},
        "queues": {
            "inbound": {"depth": 12},
            "outbound": {"depth": 0},
            "names": ["inbound", "outbound"],
        },
    });
    (registry, expected)
}
