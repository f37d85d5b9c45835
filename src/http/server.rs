//! HTTP server exposing the registry.
//!
//! # Responsibilities
//! - Serve `Registry::export()` on `GET /`
//! - Answer 405 for every other method and every other path
//! - Run in the foreground or as a background task with a stop handle

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::lifecycle::shutdown::{clamp_stop_timeout, Shutdown};
use crate::registry::Registry;

/// Default bind address of the status endpoint.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8180";

/// HTTP server for the status endpoint.
pub struct StatusServer {
    router: Router,
}

impl StatusServer {
    /// Create a server exporting `registry`.
    pub fn new(registry: Registry) -> Self {
        Self {
            router: Self::build_router(registry),
        }
    }

    fn build_router(registry: Registry) -> Router {
        Router::new()
            .route("/", any(export_handler))
            .fallback(method_not_allowed)
            .with_state(registry)
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain open
    /// connections.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Status server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(address = %addr, "Status server stopped");
        Ok(())
    }

    /// Bind `bind_address` and serve in a background task.
    pub async fn start(self, bind_address: &str) -> Result<ServerHandle, io::Error> {
        let listener = TcpListener::bind(bind_address).await?;
        let local_addr = listener.local_addr()?;

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(self.run(listener, shutdown.signalled()));

        Ok(ServerHandle {
            local_addr,
            shutdown,
            handle,
        })
    }
}

/// Handle to a server started with `StatusServer::start`.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), io::Error>>,
}

impl ServerHandle {
    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait up to `timeout_secs` (clamped
    /// to [0, 600]) for open requests to finish.
    pub async fn stop(self, timeout_secs: u64) {
        self.shutdown.trigger();

        let timeout = clamp_stop_timeout(timeout_secs);
        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => tracing::error!(error = %e, "Status server failed"),
            Ok(Err(e)) => tracing::error!(error = %e, "Status server task ended abnormally"),
            Err(_) => tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Status server did not stop in time, detaching"
            ),
        }
    }
}

/// Root handler: the whole registry as JSON.
async fn export_handler(State(registry): State<Registry>, method: Method) -> Response {
    if method != Method::GET {
        return method_not_allowed().await;
    }

    let body = registry.export();
    if body.is_empty() {
        tracing::error!("Status export failed, serving empty body");
    }
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn method_not_allowed() -> Response {
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn send(router: Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_root_exports_registry() {
        let registry = Registry::new();
        registry.set_static("app.name", "billing").unwrap();
        let server = StatusServer::new(registry);

        let response = send(server.router(), Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"app": {"name": "billing"}}));
    }

    #[tokio::test]
    async fn test_other_methods_on_root() {
        let server = StatusServer::new(Registry::new());
        for method in [Method::PUT, Method::POST, Method::PATCH, Method::DELETE, Method::HEAD] {
            let response = send(server.router(), method.clone(), "/").await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        }
    }

    #[tokio::test]
    async fn test_any_method_on_other_paths() {
        let server = StatusServer::new(Registry::new());
        for method in [Method::GET, Method::PUT, Method::POST, Method::PATCH, Method::DELETE] {
            let response = send(server.router(), method.clone(), "/any").await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        }
    }

    #[tokio::test]
    async fn test_run_returns_once_shutdown_triggers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = Shutdown::new();
        let server = tokio::spawn(StatusServer::new(Registry::new()).run(listener, shutdown.signalled()));

        shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server should stop after trigger")
            .unwrap();
        assert!(result.is_ok());
    }
}
