//! The status endpoint served over a real socket.

use std::time::Duration;

use app_status::{Registry, StatusServer};
use reqwest::{Method, StatusCode};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_export_over_http() {
    let (registry, expected) = common::sample_registry();
    let server = StatusServer::new(registry).start("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", server.local_addr());

    let res = client().get(&url).send().await.expect("Status server unreachable");
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, expected);

    server.stop(15).await;
}

#[tokio::test]
async fn test_invalid_methods_root_path() {
    let server = StatusServer::new(Registry::new()).start("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", server.local_addr());
    let client = client();

    for method in [Method::PUT, Method::POST, Method::PATCH, Method::DELETE] {
        let res = client.request(method.clone(), &url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
    }

    server.stop(15).await;
}

#[tokio::test]
async fn test_invalid_methods_any_path() {
    let server = StatusServer::new(Registry::new()).start("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/any", server.local_addr());
    let client = client();

    for method in [Method::GET, Method::PUT, Method::POST, Method::PATCH, Method::DELETE] {
        let res = client.request(method.clone(), &url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
    }

    server.stop(15).await;
}

#[tokio::test]
async fn test_export_tracks_registry_changes() {
    let registry = Registry::new();
    let server = StatusServer::new(registry.clone())
        .start("127.0.0.1:0")
        .await
        .unwrap();
    let url = format!("http://{}/", server.local_addr());
    let client = client();

    let body: serde_json::Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body, serde_json::json!({}));

    registry.set_static("jobs.pending", 4i64).unwrap();
    let body: serde_json::Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body, serde_json::json!({"jobs": {"pending": 4}}));

    registry.delete("jobs.pending", false).unwrap();
    let body: serde_json::Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body, serde_json::json!({}));

    server.stop(15).await;
}

#[tokio::test]
async fn test_stop_releases_port() {
    let server = StatusServer::new(Registry::new()).start("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr();
    server.stop(5).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    let res = client().get(format!("http://{}/", addr)).send().await;
    assert!(res.is_err(), "server should no longer accept connections");
}
