use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::dto::{parse_submission, PlanStatus, QuestionnaireStatus, SavedResponse};
use crate::{error::ApiError, state::AppState};

pub fn questionnaire_routes() -> Router<AppState> {
    Router::new()
        .route("/questionnaire", post(submit_questionnaire))
        .route("/user-questionnaire/:user_id", get(questionnaire_status))
}

#[instrument(skip(state, body))]
pub async fn submit_questionnaire(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SavedResponse>, ApiError> {
    let profile = parse_submission(&body).map_err(|e| {
        warn!(error = %e, "invalid questionnaire");
        ApiError::BadRequest(e.to_string())
    })?;
    let user_id = profile.user_id.clone();

    let existing = state.profiles.find_profile(&user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "find_profile failed");
        ApiError::Internal("Error saving questionnaire.".into())
    })?;
    if existing.is_some() {
        return Err(ApiError::BadRequest("Questionnaire already submitted.".into()));
    }

    state.profiles.insert_profile(&profile).await.map_err(|e| {
        error!(error = %e, %user_id, "insert_profile failed");
        ApiError::Internal("Error saving questionnaire.".into())
    })?;

    // calorie tracking needs a user row from the start
    state
        .meal_log
        .ensure_user(&user_id, state.config.daily_calorie_goal)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "ensure_user failed");
            ApiError::Internal("Error saving questionnaire.".into())
        })?;

    info!(%user_id, "questionnaire saved");
    Ok(Json(SavedResponse {
        success: true,
        message: "Questionnaire saved.",
    }))
}

#[instrument(skip(state))]
pub async fn questionnaire_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<QuestionnaireStatus>, ApiError> {
    let internal = |e: anyhow::Error| {
        error!(error = %e, %user_id, "questionnaire status failed");
        ApiError::Internal("Server error checking questionnaire.".into())
    };

    if state.profiles.find_profile(&user_id).await.map_err(internal)?.is_none() {
        return Ok(Json(QuestionnaireStatus {
            has_completed_questionnaire: false,
            plan: None,
        }));
    }

    let meal_plan = state.plans.find_plan(&user_id).await.map_err(internal)?;
    Ok(Json(QuestionnaireStatus {
        has_completed_questionnaire: true,
        plan: Some(PlanStatus {
            has_meal_plan: meal_plan.is_some(),
            meal_plan,
        }),
    }))
}
