use thiserror::Error;
use tracing::{info, warn};

use super::{
    model::{DayPlan, MealPlan, StoredMealPlan},
    normalizer, prompt,
};
use crate::{llm::LlmError, state::AppState};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no questionnaire for user")]
    ProfileNotFound,
    #[error(transparent)]
    Generation(#[from] LlmError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Ask the model for a new week, normalize it and replace the stored plan.
pub async fn generate_plan(state: &AppState, user_id: &str) -> Result<StoredMealPlan, PlanError> {
    let profile = state
        .profiles
        .find_profile(user_id)
        .await?
        .ok_or(PlanError::ProfileNotFound)?;

    let raw_text = state.llm.generate(&prompt::plan_prompt(&profile)).await?;
    let result = normalizer::normalize(&raw_text);
    let structured = result.is_structured();
    let stored = StoredMealPlan::from(result);

    state.plans.upsert_plan(user_id, &stored).await?;
    info!(%user_id, structured, "meal plan stored");
    Ok(stored)
}

/// Days to show for the user: stored raw text is normalized again, and an
/// empty list stands in for anything that still does not validate.
pub async fn fetch_days(state: &AppState, user_id: &str) -> Result<Vec<DayPlan>, PlanError> {
    if state.profiles.find_profile(user_id).await?.is_none() {
        return Err(PlanError::ProfileNotFound);
    }
    Ok(current_plan(state, user_id)
        .await?
        .map(|plan| plan.days.to_vec())
        .unwrap_or_default())
}

/// The user's plan in structured form, if it is (or can now be) validated.
pub async fn current_plan(state: &AppState, user_id: &str) -> anyhow::Result<Option<MealPlan>> {
    let Some(stored) = state.plans.find_plan(user_id).await? else {
        return Ok(None);
    };
    let resolved = stored.resolve();
    if resolved.is_none() {
        warn!(%user_id, "stored meal plan still does not validate");
    }
    Ok(resolved)
}
