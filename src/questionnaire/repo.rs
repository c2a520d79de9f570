use async_trait::async_trait;
use sqlx::FromRow;

use crate::db::PgStore;

/// Questionnaire answers for one user.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub weight: f64,
    pub height: f64,
    pub goal: String,
    pub meal_frequency: String,
    pub cooking_time_weekday: String,
    pub cooking_time_weekend: String,
    pub restrictions: String,
    pub eating_style: String,
    pub protein_preference: String,
    pub roti_rice_preference: String,
    pub oil_fat_preference: String,
    pub health_issues: String,
    pub exercise_frequency: String,
    pub energy_level: String,
    pub budget_priority: String,
    pub eating_out_frequency: String,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, user_id: &str) -> anyhow::Result<Option<Profile>>;
    async fn insert_profile(&self, profile: &Profile) -> anyhow::Result<()>;
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profile(&self, user_id: &str) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, name, age, gender, weight, height, goal, meal_frequency,
                   cooking_time_weekday, cooking_time_weekend, restrictions, eating_style,
                   protein_preference, roti_rice_preference, oil_fat_preference,
                   health_issues, exercise_frequency, energy_level, budget_priority,
                   eating_out_frequency
            FROM questionnaires
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(profile)
    }

    async fn insert_profile(&self, p: &Profile) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO questionnaires (
                user_id, name, age, gender, weight, height, goal, meal_frequency,
                cooking_time_weekday, cooking_time_weekend, restrictions, eating_style,
                protein_preference, roti_rice_preference, oil_fat_preference,
                health_issues, exercise_frequency, energy_level, budget_priority,
                eating_out_frequency
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(&p.user_id)
        .bind(&p.name)
        .bind(p.age)
        .bind(&p.gender)
        .bind(p.weight)
        .bind(p.height)
        .bind(&p.goal)
        .bind(&p.meal_frequency)
        .bind(&p.cooking_time_weekday)
        .bind(&p.cooking_time_weekend)
        .bind(&p.restrictions)
        .bind(&p.eating_style)
        .bind(&p.protein_preference)
        .bind(&p.roti_rice_preference)
        .bind(&p.oil_fat_preference)
        .bind(&p.health_issues)
        .bind(&p.exercise_frequency)
        .bind(&p.energy_level)
        .bind(&p.budget_priority)
        .bind(&p.eating_out_frequency)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
