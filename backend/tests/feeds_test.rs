//! Integration tests for the feed catalog endpoints

mod common;

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_list_feeds() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/feeds").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["count"], 6);
    let names: Vec<&str> = json["feeds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|feed| feed["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"grass_hay"));
    assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_get_feed() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/feeds/alfalfa_hay").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["class"], "forage");
    assert_eq!(json["cation_buffer"], true);
}

#[tokio::test]
async fn test_unknown_feed_is_not_found() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/feeds/kelp").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}
