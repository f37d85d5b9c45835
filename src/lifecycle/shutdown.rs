//! Shutdown coordination for background work.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;

/// Upper bound for any stop timeout, in seconds.
pub const MAX_STOP_TIMEOUT_SECS: u64 = 600;

/// Clamp a stop timeout into `[0, MAX_STOP_TIMEOUT_SECS]` seconds.
pub fn clamp_stop_timeout(timeout_secs: u64) -> Duration {
    Duration::from_secs(timeout_secs.min(MAX_STOP_TIMEOUT_SECS))
}

/// Coordinator for cooperative shutdown.
///
/// The scheduler's polling loop and the HTTP server each own one and
/// subscribe to it when they start.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// A future that resolves once `trigger` is called or the
    /// coordinator is dropped.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_stop_timeout() {
        assert_eq!(clamp_stop_timeout(0), Duration::ZERO);
        assert_eq!(clamp_stop_timeout(15), Duration::from_secs(15));
        assert_eq!(clamp_stop_timeout(10_000), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_signalled_resolves_on_trigger() {
        let shutdown = Shutdown::new();
        let signalled = shutdown.signalled();
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), signalled)
            .await
            .expect("signal should resolve after trigger");
    }
}
