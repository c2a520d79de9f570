use serde::{Deserialize, Serialize};

use super::model::{DayPlan, StoredMealPlan};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanResponse {
    pub success: bool,
    pub meal_plan: StoredMealPlan,
}

#[derive(Debug, Serialize)]
pub struct PlanDays {
    pub days: Vec<DayPlan>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub meal_plan: PlanDays,
}
