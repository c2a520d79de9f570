use crate::questionnaire::repo::Profile;

const PLAN_CONTRACT: &str = r#"**Important**: Output must be valid JSON only, no markdown fences or extra text.
The JSON must have exactly this structure:
{
  "days": [
    {
      "day": "Monday",
      "breakfast": { "item": "meal description", "nutrition": { "calories": 500, "protein": 20, "carbs": 60, "fat": 15 } },
      "lunch": { "item": "meal description", "nutrition": { "calories": 600, "protein": 25, "carbs": 70, "fat": 20 } },
      "dinner": { "item": "meal description", "nutrition": { "calories": 550, "protein": 22, "carbs": 65, "fat": 18 } },
      "snacks": { "item": "meal description", "nutrition": { "calories": 200, "protein": 8, "carbs": 25, "fat": 7 } }
    }
  ]
}

Rules:
1. Each day must have "day" as the full day name (e.g., "Monday", "Tuesday", etc.).
2. Each meal must have "item" and "nutrition" fields.
3. Nutrition values must be numbers only (no units).
4. The days array must contain exactly 7 days, starting from Monday.
5. Do not include any text before or after the JSON.
6. Do not use markdown formatting.
7. Ensure all property names are in double quotes.
8. Use proper JSON syntax with commas.

Respond with that JSON exactly."#;

/// Prompt asking for a week of meals shaped the way the normalizer expects.
pub fn plan_prompt(p: &Profile) -> String {
    format!(
        "Generate a personalized 7-day Indian meal plan based on:\n\
         - Name: {}, Age: {}, Gender: {}\n\
         - Height: {} cm, Weight: {} kg\n\
         - Goal: {}, Meals per day: {}\n\
         - Cooking Time (Weekday): {}, (Weekend): {}\n\
         - Dietary Restrictions: {}\n\
         - Eating Style: {}\n\
         - Protein Preference: {}\n\
         - Roti/Rice Preference: {}\n\
         - Oil/Fat Preference: {}\n\
         - Health Issues: {}\n\
         - Exercise Frequency: {}, Energy Level: {}\n\
         - Budget Priority: {}, Eats Out Frequency: {}\n\n\
         {}",
        p.name,
        p.age,
        p.gender,
        p.height,
        p.weight,
        p.goal,
        p.meal_frequency,
        p.cooking_time_weekday,
        p.cooking_time_weekend,
        p.restrictions,
        p.eating_style,
        p.protein_preference,
        p.roti_rice_preference,
        p.oil_fat_preference,
        p.health_issues,
        p.exercise_frequency,
        p.energy_level,
        p.budget_priority,
        p.eating_out_frequency,
        PLAN_CONTRACT,
    )
}
