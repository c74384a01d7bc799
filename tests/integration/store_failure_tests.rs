//! Behavior while the counter store is unavailable.
//!
//! Counting is best-effort: generation must succeed and stats must report 0
//! when every store operation fails.

use axum::http::StatusCode;

use super::test_utils::{body_bytes, body_json, failing_router, get, is_png, post_json};

#[tokio::test]
async fn test_generation_succeeds_when_store_unavailable() {
    let (router, store) = failing_router();

    let response = post_json(
        &router,
        "/qr/generate",
        r#"{"content":"https://example.com","moduleSize":10}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    assert!(is_png(&body_bytes(response).await));

    // The increment was attempted and its failure swallowed
    assert_eq!(store.attempts(), 1);
}

#[tokio::test]
async fn test_stats_degrades_to_zero_when_store_unavailable() {
    let (router, store) = failing_router();

    let response = get(&router, "/stats/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"total_qr_generated": 0})
    );
    assert_eq!(store.attempts(), 1);
}

#[tokio::test]
async fn test_validation_failure_never_touches_store() {
    let (router, store) = failing_router();

    let response = post_json(&router, "/qr/generate", r#"{"content":"x","moduleSize":0}"#).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.attempts(), 0);
}

#[tokio::test]
async fn test_encoding_failure_never_touches_store() {
    let (router, store) = failing_router();

    let response = post_json(
        &router,
        "/qr/generate",
        r#"{"content":"x","backgroundColor":"plaid"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.attempts(), 0);
}

#[tokio::test]
async fn test_health_independent_of_store() {
    let (router, store) = failing_router();

    let response = get(&router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.attempts(), 0);
}
