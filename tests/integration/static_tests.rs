//! Landing page and static asset tests.

use axum::http::StatusCode;
use tempfile::TempDir;

use qrgen_server::RouterConfig;

use super::test_utils::{body_bytes, body_json, get, TestApp};

fn config_with_static(dir: &std::path::Path) -> RouterConfig {
    RouterConfig::new()
        .with_tracing(false)
        .with_static_dir(dir)
}

#[tokio::test]
async fn test_bundled_landing_page() {
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    let app = TestApp::with_config(config_with_static(std::path::Path::new(static_dir))).await;

    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("text/html"));

    let body = body_bytes(response).await;
    assert!(String::from_utf8_lossy(&body).contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_root_without_static_dir() {
    let app = TestApp::new().await;

    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"message": "Frontend not found"})
    );
}

#[tokio::test]
async fn test_root_with_static_dir_missing_index() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::with_config(config_with_static(dir.path())).await;

    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Frontend not found");
}

#[tokio::test]
async fn test_static_assets_served() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("app.css"), "body { color: red; }").unwrap();
    std::fs::write(dir.path().join("index.html"), "<!DOCTYPE html><p>hi</p>").unwrap();

    let app = TestApp::with_config(config_with_static(dir.path())).await;

    let response = get(&app.router, "/static/app.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(response).await.as_ref(),
        b"body { color: red; }"
    );

    let response = get(&app.router, "/static/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app.router, "/").await;
    assert_eq!(
        body_bytes(response).await.as_ref(),
        b"<!DOCTYPE html><p>hi</p>"
    );
}

#[tokio::test]
async fn test_static_not_mounted_when_dir_missing() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    let app = TestApp::with_config(config_with_static(&missing)).await;

    let response = get(&app.router, "/static/app.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
