use serde::{Deserialize, Serialize};

use super::normalizer;

/// Number of days every structured plan carries.
pub const DAYS_PER_PLAN: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub item: String,
    pub nutrition: NutritionInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snacks: Meal,
}

/// A fully validated week. The array length is the day-count invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub days: [DayPlan; DAYS_PER_PLAN],
}

/// Outcome of normalizing model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MealPlanResult {
    Structured(MealPlan),
    Raw {
        #[serde(rename = "rawText")]
        raw_text: String,
    },
}

impl MealPlanResult {
    pub fn structured(self) -> Option<MealPlan> {
        match self {
            MealPlanResult::Structured(plan) => Some(plan),
            MealPlanResult::Raw { .. } => None,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, MealPlanResult::Structured(_))
    }
}

/// Shape of the plan document persisted per user: either `{ "days": [...] }`
/// or `{ "rawText": "..." }` waiting for another normalization attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredMealPlan {
    Raw {
        #[serde(rename = "rawText")]
        raw_text: String,
    },
    Structured(MealPlan),
}

impl StoredMealPlan {
    /// Structured view of the stored plan. Raw text is run through the
    /// normalizer again on every call.
    pub fn resolve(&self) -> Option<MealPlan> {
        match self {
            StoredMealPlan::Structured(plan) => Some(plan.clone()),
            StoredMealPlan::Raw { raw_text } => normalizer::normalize(raw_text).structured(),
        }
    }
}

impl From<MealPlanResult> for StoredMealPlan {
    fn from(result: MealPlanResult) -> Self {
        match result {
            MealPlanResult::Structured(plan) => StoredMealPlan::Structured(plan),
            MealPlanResult::Raw { raw_text } => StoredMealPlan::Raw { raw_text },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meal(item: &str, calories: f64) -> Meal {
        Meal {
            item: item.into(),
            nutrition: NutritionInfo {
                calories,
                protein: 10.0,
                carbs: 20.0,
                fat: 5.0,
            },
        }
    }

    fn plan() -> MealPlan {
        let day = |name: &str| DayPlan {
            day: name.into(),
            breakfast: meal("Idli", 200.0),
            lunch: meal("Dal rice", 550.0),
            dinner: meal("Roti sabzi", 480.0),
            snacks: meal("Sprouts", 150.0),
        };
        MealPlan {
            days: [
                day("Monday"),
                day("Tuesday"),
                day("Wednesday"),
                day("Thursday"),
                day("Friday"),
                day("Saturday"),
                day("Sunday"),
            ],
        }
    }

    #[test]
    fn result_is_tagged_by_kind() {
        let raw = MealPlanResult::Raw {
            raw_text: "oops".into(),
        };
        assert_eq!(
            serde_json::to_value(&raw).unwrap(),
            json!({ "kind": "raw", "rawText": "oops" })
        );

        let structured = serde_json::to_value(MealPlanResult::Structured(plan())).unwrap();
        assert_eq!(structured["kind"], "structured");
        assert_eq!(structured["days"].as_array().unwrap().len(), DAYS_PER_PLAN);
    }

    #[test]
    fn stored_plan_keeps_document_shapes() {
        let raw: StoredMealPlan = serde_json::from_value(json!({ "rawText": "abc" })).unwrap();
        assert_eq!(
            raw,
            StoredMealPlan::Raw {
                raw_text: "abc".into()
            }
        );

        let stored = StoredMealPlan::Structured(plan());
        let value = serde_json::to_value(&stored).unwrap();
        assert!(value.get("rawText").is_none());
        assert_eq!(value["days"][0]["day"], "Monday");

        let back: StoredMealPlan = serde_json::from_value(value).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn six_stored_days_do_not_decode_as_structured() {
        let mut value = serde_json::to_value(plan()).unwrap();
        value["days"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<StoredMealPlan>(value).is_err());
    }

    #[test]
    fn resolve_retries_raw_text() {
        let text = serde_json::to_string(&plan()).unwrap();
        let stored = StoredMealPlan::Raw {
            raw_text: format!("```json\n{}\n```", text),
        };
        assert_eq!(stored.resolve(), Some(plan()));

        let broken = StoredMealPlan::Raw {
            raw_text: "not a plan".into(),
        };
        assert_eq!(broken.resolve(), None);
    }
}
