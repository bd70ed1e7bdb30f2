//! Ration evaluation API routes

use crate::error::ApiError;
use crate::services::RationService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use ration_lab_shared::{EvaluateRationRequest, Evaluation};

/// Create ration routes
pub fn ration_routes() -> Router<AppState> {
    Router::new().route("/evaluate", post(evaluate_ration))
}

/// POST /api/v1/rations/evaluate
///
/// Quantities are kg DM/day unless an item carries `"unit": "lb"`. A body
/// that does not deserialize is a `BAD_REQUEST` error.
async fn evaluate_ration(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRationRequest>, JsonRejection>,
) -> Result<Json<Evaluation>, ApiError> {
    let Json(req) = payload?;
    let evaluation = RationService::evaluate(state.engine(), &req)?;
    Ok(Json(evaluation))
}
