//! Feed catalog API routes

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use ration_lab_shared::{EngineError, FeedListResponse, Ingredient};

/// Create feed catalog routes
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feeds))
        .route("/:name", get(get_feed))
}

/// GET /api/v1/feeds - All catalog ingredients in name order
async fn list_feeds(State(state): State<AppState>) -> Json<FeedListResponse> {
    let feeds: Vec<Ingredient> = state.engine().library().iter().cloned().collect();
    Json(FeedListResponse {
        count: feeds.len(),
        feeds,
    })
}

/// GET /api/v1/feeds/:name
async fn get_feed(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Ingredient>, ApiError> {
    match state.engine().library().lookup(&name) {
        Ok(feed) => Ok(Json(feed.clone())),
        Err(EngineError::UnknownIngredient(name)) => {
            Err(ApiError::NotFound(format!("Feed not found: {}", name)))
        }
        Err(err) => Err(err.into()),
    }
}
