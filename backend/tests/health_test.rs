//! Integration tests for health check endpoints

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alive"));
}

#[tokio::test]
async fn test_readiness_endpoint_reports_feeds() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["checks"]["feed_library"]["feeds"], 6);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = common::TestApp::new();

    let (status, _) = app.get("/metrics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let app = common::TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
