//! Sulfur and feedlot calculator routes

use crate::error::ApiError;
use crate::services::CalculatorService;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use ration_lab_shared::{Closeout, CloseoutInput, SulfurInput, SulfurOutcome};

/// Create sulfur routes
pub fn sulfur_routes() -> Router<AppState> {
    Router::new().route("/evaluate", post(evaluate_sulfur))
}

/// Create feedlot routes
pub fn feedlot_routes() -> Router<AppState> {
    Router::new().route("/closeout", post(project_closeout))
}

/// POST /api/v1/sulfur/evaluate
async fn evaluate_sulfur(
    payload: Result<Json<SulfurInput>, JsonRejection>,
) -> Result<Json<SulfurOutcome>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(CalculatorService::sulfur(&req)?))
}

/// POST /api/v1/feedlot/closeout
async fn project_closeout(
    payload: Result<Json<CloseoutInput>, JsonRejection>,
) -> Result<Json<Closeout>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(CalculatorService::closeout(&req)?))
}
