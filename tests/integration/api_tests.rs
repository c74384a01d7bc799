//! API integration tests for QR generation and error handling.
//!
//! Tests verify:
//! - PNG generation and the counter side effect
//! - Validation failures (422) leave the counter untouched
//! - Encoding failures (500) hide their cause from the client
//! - Health and stats responses

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::test_utils::{
    body_bytes, body_json, decode_qr, get, is_png, png_dimensions, post_json, stats_total, TestApp,
};

// =============================================================================
// Successful Generation
// =============================================================================

#[tokio::test]
async fn test_generate_then_stats_increments_by_one() {
    let app = TestApp::new().await;
    let before = stats_total(&app.router).await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"https://example.com","moduleSize":10}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");

    let body = body_bytes(response).await;
    assert!(!body.is_empty());
    assert!(is_png(&body), "Response should be a PNG");

    assert_eq!(stats_total(&app.router).await, before + 1);
}

#[tokio::test]
async fn test_generated_image_decodes_to_content() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"https://example.com/some/path?x=1","moduleSize":4}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    assert_eq!(decode_qr(&body), "https://example.com/some/path?x=1");
}

#[tokio::test]
async fn test_generate_with_all_parameters() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r##"{
            "content": "hi",
            "moduleSize": 5,
            "borderWidth": 2,
            "foregroundColor": "#000080",
            "backgroundColor": "rgb(255, 255, 240)"
        }"##,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    // "hi" fits a version 1 symbol: 21 modules plus 2 on each side
    assert_eq!(png_dimensions(&body), (25 * 5, 25 * 5));
    assert_eq!(decode_qr(&body), "hi");
}

#[tokio::test]
async fn test_generate_with_legacy_field_names() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"url":"https://example.com","box_size":10,"fill_color":"black","back_color":"white"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn test_generate_counts_each_success() {
    let app = TestApp::new().await;

    for i in 0..5 {
        let body = format!(r#"{{"content":"item-{}","moduleSize":2}}"#, i);
        let response = post_json(&app.router, "/qr/generate", &body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.count().await, 5);
    assert_eq!(stats_total(&app.router).await, 5);
}

// =============================================================================
// Validation Failures
// =============================================================================

#[tokio::test]
async fn test_module_size_out_of_range() {
    let app = TestApp::new().await;
    let before = app.count().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"https://example.com","moduleSize":100}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = body_json(response).await;
    assert_eq!(error["error"], "validation_error");
    assert_eq!(error["status"], 422);
    assert_eq!(error["details"][0]["field"], "moduleSize");

    assert_eq!(app.count().await, before);
}

#[tokio::test]
async fn test_border_width_out_of_range() {
    let app = TestApp::new().await;

    for border in ["-1", "21"] {
        let body = format!(r#"{{"content":"x","borderWidth":{}}}"#, border);
        let response = post_json(&app.router, "/qr/generate", &body).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let error = body_json(response).await;
        assert_eq!(error["details"][0]["field"], "borderWidth");
    }

    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_all_violations_reported() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"moduleSize":0,"borderWidth":50}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = body_json(response).await;
    let fields: Vec<&str> = error["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["content", "moduleSize", "borderWidth"]);
}

#[tokio::test]
async fn test_empty_content_rejected() {
    let app = TestApp::new().await;

    let response = post_json(&app.router, "/qr/generate", r#"{"content":""}"#).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = body_json(response).await;
    assert_eq!(error["details"][0]["field"], "content");
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = TestApp::new().await;

    let response = post_json(&app.router, "/qr/generate", "{not json").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = body_json(response).await;
    assert_eq!(error["details"][0]["field"], "body");
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_wrong_field_type_rejected() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"x","moduleSize":"large"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/qr/generate")
        .body(Body::from(r#"{"content":"x"}"#))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_oversized_body_keeps_payload_too_large_status() {
    let app = TestApp::new().await;

    // Over axum's default 2 MB body limit
    let body = format!(r#"{{"content":"{}"}}"#, "a".repeat(3 * 1024 * 1024));
    let response = post_json(&app.router, "/qr/generate", &body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let error = body_json(response).await;
    assert_eq!(error["error"], "request_error");
    assert_eq!(error["status"], 413);
    assert!(error.get("details").is_none());
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_sizes_as_strings_and_integral_floats() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"hi","moduleSize":"3","borderWidth":2.0}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Version 1 symbol: 21 modules plus 2 on each side, 3 px per module
    assert_eq!(png_dimensions(&body_bytes(response).await), (75, 75));
    assert_eq!(app.count().await, 1);

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"hi","moduleSize":2.5}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn test_generate_requires_post() {
    let app = TestApp::new().await;

    let response = get(&app.router, "/qr/generate").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Encoding Failures
// =============================================================================

#[tokio::test]
async fn test_invalid_color_is_server_error() {
    let app = TestApp::new().await;

    let response = post_json(
        &app.router,
        "/qr/generate",
        r#"{"content":"x","foregroundColor":"not-a-real-color"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_bytes(response).await;
    let text = String::from_utf8_lossy(&body);
    // The cause is logged, never sent to the client
    assert!(!text.contains("not-a-real-color"));

    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "encoding_error");
    assert_eq!(error["message"], "Could not generate QR code");

    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_content_too_long_is_server_error() {
    let app = TestApp::new().await;

    let body = serde_json::json!({
        "content": "x".repeat(3000),
        "moduleSize": 1,
    })
    .to_string();

    let response = post_json(&app.router, "/qr/generate", &body).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error = body_json(response).await;
    assert_eq!(error["message"], "Could not generate QR code");
    assert!(error.get("details").is_none());
    assert_eq!(app.count().await, 0);
}

// =============================================================================
// Health and Stats
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_stats_fresh_store_is_zero() {
    let app = TestApp::new().await;

    let response = get(&app.router, "/stats/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"total_qr_generated": 0})
    );
}

#[tokio::test]
async fn test_stats_without_trailing_slash() {
    let app = TestApp::new().await;

    let response = get(&app.router, "/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total_qr_generated"], 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new().await;

    let response = get(&app.router, "/nonexistent").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
