//! Integration tests for ration evaluation

mod common;

use axum::http::StatusCode;
use serde_json::json;

const EVALUATE: &str = "/api/v1/rations/evaluate";

#[tokio::test]
async fn test_evaluate_balanced_ration() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            EVALUATE,
            &json!({"ration": [
                {"ingredient": "grass_hay", "quantity": 8.0},
                {"ingredient": "alfalfa_hay", "quantity": 4.0},
                {"ingredient": "dry_rolled_corn", "quantity": 3.0},
                {"ingredient": "soybean_meal", "quantity": 1.0}
            ]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["profile"]["dmi_kg"], 16.0);
    let ph = json["state"]["ph"].as_f64().unwrap();
    assert!((5.0..=7.1).contains(&ph));

    let expected = json["outcome"]["expected_energy"].as_f64().unwrap();
    let realized = json["outcome"]["realized_energy"].as_f64().unwrap();
    let wasted = json["outcome"]["wasted_energy"].as_f64().unwrap();
    assert!((expected - realized - wasted).abs() < 1e-9);
    assert_eq!(json["outcome"]["statuses"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_low_protein_forage_is_flagged() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            EVALUATE,
            &json!({"ration": [{"ingredient": "grass_hay", "quantity": 10.0}]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let findings = json["outcome"]["findings"].as_array().unwrap();
    assert_eq!(findings[0]["severity"], "critical");
    assert_eq!(findings[0]["category"], "nitrogen");
}

#[tokio::test]
async fn test_pound_quantities_are_converted() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            EVALUATE,
            &json!({"ration": [
                {"ingredient": "grass_hay", "quantity": 22.0462262, "unit": "lb"}
            ]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let dmi = json["profile"]["dmi_kg"].as_f64().unwrap();
    assert!((dmi - 10.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_unknown_ingredient_rejected() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            EVALUATE,
            &json!({"ration": [
                {"ingredient": "grass_hay", "quantity": 5.0},
                {"ingredient": "kelp", "quantity": 0.0}
            ]}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "UNKNOWN_INGREDIENT");
}

#[tokio::test]
async fn test_empty_ration_rejected() {
    let app = common::TestApp::new();

    for body in [
        json!({"ration": []}),
        json!({"ration": [{"ingredient": "grass_hay", "quantity": 0.0}]}),
    ] {
        let (status, json) = app.post_json(EVALUATE, &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "EMPTY_RATION");
    }
}

#[tokio::test]
async fn test_negative_quantity_is_validation_error() {
    let app = common::TestApp::new();

    let (status, json) = app
        .post_json(
            EVALUATE,
            &json!({"ration": [{"ingredient": "grass_hay", "quantity": -1.0}]}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "ration[0].quantity");
}

#[tokio::test]
async fn test_malformed_body_returns_error_envelope() {
    let app = common::TestApp::new();

    for body in ["{\"ration\": 3}", "not json", "{\"ration\": [{\"quantity\": 1.0}]}"] {
        let (status, text) = app.post(EVALUATE, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(!json["error"]["message"].as_str().unwrap().is_empty());
    }
}
