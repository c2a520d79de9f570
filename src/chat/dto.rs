use serde::{Deserialize, Serialize};

/// Macros for one eaten meal, as estimated by the image model on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroRecord {
    pub food: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessMealRequest {
    #[serde(default)]
    pub macros: Option<MacroRecord>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub today_calories: f64,
    pub daily_goal: i32,
    pub percentage: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMealResponse {
    pub gemini_text: String,
    pub updated_totals: Option<DailyTotals>,
}
