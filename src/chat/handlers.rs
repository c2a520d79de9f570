use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, instrument};

use super::{
    dto::{ProcessMealRequest, ProcessMealResponse},
    services,
};
use crate::{auth::extractors::UserId, error::ApiError, state::AppState};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/process-meal", post(process_meal))
}

#[instrument(skip(state, body))]
pub async fn process_meal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<ProcessMealRequest>,
) -> Result<Json<ProcessMealResponse>, ApiError> {
    services::process_meal(&state, &user_id, body)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, %user_id, "process-meal failed");
            ApiError::Internal("Internal server error.".into())
        })
}
