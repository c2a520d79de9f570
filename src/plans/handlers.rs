use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::{
    dto::{GeneratePlanRequest, GeneratePlanResponse, PlanDays, PlanResponse},
    services::{self, PlanError},
};
use crate::{error::ApiError, state::AppState};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-meal-plan", post(generate_meal_plan))
        .route("/meal-plan/:user_id", get(get_meal_plan))
}

#[instrument(skip(state, body))]
pub async fn generate_meal_plan(
    State(state): State<AppState>,
    Json(body): Json<GeneratePlanRequest>,
) -> Result<Json<GeneratePlanResponse>, ApiError> {
    let user_id = body
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("userId is required.".into()))?;

    match services::generate_plan(&state, &user_id).await {
        Ok(meal_plan) => Ok(Json(GeneratePlanResponse {
            success: true,
            meal_plan,
        })),
        Err(PlanError::ProfileNotFound) => {
            warn!(%user_id, "plan requested before questionnaire");
            Err(ApiError::NotFound("User not found.".into()))
        }
        Err(e) => {
            error!(error = %e, %user_id, "generate-meal-plan failed");
            Err(ApiError::Internal("Failed to generate meal plan.".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_meal_plan(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    match services::fetch_days(&state, &user_id).await {
        Ok(days) => Ok(Json(PlanResponse {
            meal_plan: PlanDays { days },
        })),
        Err(PlanError::ProfileNotFound) => Err(ApiError::NotFound("User not found.".into())),
        Err(e) => {
            error!(error = %e, %user_id, "fetch meal plan failed");
            Err(ApiError::Internal("Failed to fetch meal plan.".into()))
        }
    }
}
