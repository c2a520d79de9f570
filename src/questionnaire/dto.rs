use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::repo::Profile;
use crate::plans::model::StoredMealPlan;

/// Every answer a submission must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 20] = [
    "userId",
    "name",
    "age",
    "gender",
    "weight",
    "height",
    "goal",
    "mealFrequency",
    "cookingTimeWeekday",
    "cookingTimeWeekend",
    "restrictions",
    "eatingStyle",
    "proteinPreference",
    "rotiRicePreference",
    "oilFatPreference",
    "healthIssues",
    "exerciseFrequency",
    "energyLevel",
    "budgetPriority",
    "eatingOutFrequency",
];

#[derive(Debug, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Missing fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Invalid number for {0}")]
    InvalidNumber(&'static str),
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireStatus {
    pub has_completed_questionnaire: bool,
    #[serde(flatten)]
    pub plan: Option<PlanStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatus {
    pub has_meal_plan: bool,
    pub meal_plan: Option<StoredMealPlan>,
}

/// Empty strings, zero, `false` and `null` count as not answered.
fn is_answered(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(false, |v| v != 0.0),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

pub fn missing_fields(body: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !is_answered(body.get(field)))
        .collect()
}

fn text(body: &Value, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn number(body: &Value, field: &'static str) -> Result<f64, SubmissionError> {
    let parsed = match body.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or(SubmissionError::InvalidNumber(field))
}

/// Validate a raw submission body and turn it into a profile.
pub fn parse_submission(body: &Value) -> Result<Profile, SubmissionError> {
    let missing = missing_fields(body);
    if !missing.is_empty() {
        return Err(SubmissionError::Missing(missing));
    }

    Ok(Profile {
        user_id: text(body, "userId"),
        name: text(body, "name"),
        age: number(body, "age")?,
        gender: text(body, "gender"),
        weight: number(body, "weight")?,
        height: number(body, "height")?,
        goal: text(body, "goal"),
        meal_frequency: text(body, "mealFrequency"),
        cooking_time_weekday: text(body, "cookingTimeWeekday"),
        cooking_time_weekend: text(body, "cookingTimeWeekend"),
        restrictions: text(body, "restrictions"),
        eating_style: text(body, "eatingStyle"),
        protein_preference: text(body, "proteinPreference"),
        roti_rice_preference: text(body, "rotiRicePreference"),
        oil_fat_preference: text(body, "oilFatPreference"),
        health_issues: text(body, "healthIssues"),
        exercise_frequency: text(body, "exerciseFrequency"),
        energy_level: text(body, "energyLevel"),
        budget_priority: text(body, "budgetPriority"),
        eating_out_frequency: text(body, "eatingOutFrequency"),
    })
}

#[cfg(test)]
pub(crate) fn sample_submission(user_id: &str) -> Value {
    serde_json::json!({
        "userId": user_id,
        "name": "Asha",
        "age": "29",
        "gender": "female",
        "weight": 62,
        "height": 160.5,
        "goal": "lose fat",
        "mealFrequency": "4",
        "cookingTimeWeekday": "30 min",
        "cookingTimeWeekend": "1 hour",
        "restrictions": "none",
        "eatingStyle": "vegetarian",
        "proteinPreference": "paneer",
        "rotiRicePreference": "roti",
        "oilFatPreference": "low",
        "healthIssues": "none",
        "exerciseFrequency": "3x week",
        "energyLevel": "medium",
        "budgetPriority": "moderate",
        "eatingOutFrequency": "rarely"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_submission_parses() {
        let profile = parse_submission(&sample_submission("user_1")).unwrap();
        assert_eq!(profile.user_id, "user_1");
        assert_eq!(profile.age, 29.0);
        assert_eq!(profile.weight, 62.0);
        assert_eq!(profile.height, 160.5);
        assert_eq!(profile.meal_frequency, "4");
        assert_eq!(profile.eating_out_frequency, "rarely");
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let mut body = sample_submission("user_1");
        let obj = body.as_object_mut().unwrap();
        obj.remove("goal");
        obj.insert("name".into(), Value::String(String::new()));
        obj.insert("age".into(), serde_json::json!(0));
        obj.insert("budgetPriority".into(), Value::Null);

        let err = parse_submission(&body).unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Missing(vec!["name", "age", "goal", "budgetPriority"])
        );
        assert_eq!(err.to_string(), "Missing fields: name, age, goal, budgetPriority");
    }

    #[test]
    fn non_numeric_measurements_are_rejected() {
        let mut body = sample_submission("user_1");
        body["height"] = serde_json::json!("tall");
        assert_eq!(
            parse_submission(&body).unwrap_err(),
            SubmissionError::InvalidNumber("height")
        );
    }

    #[test]
    fn status_without_questionnaire_has_one_flag() {
        let status = QuestionnaireStatus {
            has_completed_questionnaire: false,
            plan: None,
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({ "hasCompletedQuestionnaire": false })
        );

        let status = QuestionnaireStatus {
            has_completed_questionnaire: true,
            plan: Some(PlanStatus {
                has_meal_plan: false,
                meal_plan: None,
            }),
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({
                "hasCompletedQuestionnaire": true,
                "hasMealPlan": false,
                "mealPlan": null
            })
        );
    }
}
