//! Prometheus scrape endpoint

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// GET /metrics - Prometheus text format
///
/// 404 when no recorder was installed (tests, embedded use).
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "Metrics recorder not installed".to_string(),
        ),
    }
}
