use thiserror::Error;
use time::{OffsetDateTime, Time};
use tracing::{debug, info, warn};

use super::{
    dto::{DailyTotals, MacroRecord, ProcessMealRequest, ProcessMealResponse},
    repo::DailyIntake,
};
use crate::{
    llm::LlmError,
    plans::{model::MealPlan, services::current_plan},
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Generation(#[from] LlmError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub fn start_of_day(now: OffsetDateTime) -> OffsetDateTime {
    now.replace_time(Time::MIDNIGHT)
}

/// Totals reported back to the client. A non-positive stored goal falls
/// back to `default_goal`.
pub fn daily_totals(intake: DailyIntake, default_goal: i32) -> DailyTotals {
    let daily_goal = if intake.daily_goal > 0 {
        intake.daily_goal
    } else {
        default_goal
    };
    let percentage = (intake.today_calories / f64::from(daily_goal.max(1)) * 100.0).round() as i64;
    DailyTotals {
        today_calories: intake.today_calories,
        daily_goal,
        percentage,
    }
}

/// Prompt for the coaching reply: plan context first, then either the
/// logged macros or the user's question.
pub fn coach_prompt(
    user_id: &str,
    plan: Option<&MealPlan>,
    macros: Option<&MacroRecord>,
    note: &str,
    daily_goal: i32,
) -> String {
    let mut sections = Vec::with_capacity(2);

    match plan.and_then(|p| serde_json::to_string(p).ok()) {
        Some(json) => sections.push(format!(
            "Here is the user's saved 7-day meal plan (JSON):\n{json}"
        )),
        None => sections.push(format!("No saved meal plan found for user {user_id}.")),
    }

    match macros {
        Some(m) => sections.push(format!(
            "The user's most recent meal macros are:\n\
             - Calories: {} kcal\n\
             - Protein: {} g\n\
             - Fat: {} g\n\
             - Carbs: {} g\n\n\
             User note: \"{note}\"\n\n\
             Please respond in **no more than FOUR lines**. Include:\n\
             1) All four macros in one line (e.g. \"Calories: 972 kcal; Protein: 36 g; ...\").\n\
             2) \"Today's calories: [sum] kcal / {daily_goal} kcal ([percent]% of goal)\".\n\
             3) \"Next meal: [one meal from the saved plan]\".\n\
             4) A one-sentence tip.",
            m.calories, m.protein, m.fat, m.carbs
        )),
        None => sections.push(format!(
            "User wrote: \"{note}\"\n\n\
             As a nutrition coach, and using the plan above if it exists, respond in \
             **no more than TWO lines**:\n\
             1) Acknowledge their question in context of the plan.\n\
             2) Give a quick suggestion referencing the plan.\n\n\
             If there's no plan, give a two-line friendly tip."
        )),
    }

    sections.join("\n\n")
}

/// Answer a chat message, logging the meal when macros are attached.
pub async fn process_meal(
    state: &AppState,
    user_id: &str,
    request: ProcessMealRequest,
) -> Result<ProcessMealResponse, ChatError> {
    let plan = match current_plan(state, user_id).await {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, %user_id, "could not load meal plan for chat");
            None
        }
    };
    if plan.is_none() {
        debug!(%user_id, "no structured plan for chat context");
    }

    let default_goal = state.config.daily_calorie_goal;
    let daily_goal = match state.meal_log.daily_goal(user_id).await {
        Ok(goal) => goal.filter(|g| *g > 0).unwrap_or(default_goal),
        Err(e) => {
            warn!(error = %e, %user_id, "could not load daily goal for chat");
            default_goal
        }
    };

    let note = request.prompt.as_deref().unwrap_or_default();
    let prompt = coach_prompt(
        user_id,
        plan.as_ref(),
        request.macros.as_ref(),
        note,
        daily_goal,
    );
    let gemini_text = state.llm.generate(&prompt).await?;

    let updated_totals = match &request.macros {
        Some(macros) => {
            let since = start_of_day(OffsetDateTime::now_utc());
            let intake = state
                .meal_log
                .record_meal(user_id, macros, since, default_goal)
                .await?;
            let totals = daily_totals(intake, default_goal);
            info!(%user_id, today = totals.today_calories, percentage = totals.percentage, "meal logged");
            Some(totals)
        }
        None => None,
    };

    Ok(ProcessMealResponse {
        gemini_text,
        updated_totals,
    })
}
