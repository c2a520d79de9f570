use async_trait::async_trait;
use tracing::warn;

use super::model::StoredMealPlan;
use crate::db::PgStore;

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn find_plan(&self, user_id: &str) -> anyhow::Result<Option<StoredMealPlan>>;
    /// Replaces whatever plan the user had.
    async fn upsert_plan(&self, user_id: &str, plan: &StoredMealPlan) -> anyhow::Result<()>;
}

#[async_trait]
impl PlanStore for PgStore {
    async fn find_plan(&self, user_id: &str) -> anyhow::Result<Option<StoredMealPlan>> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            r#"SELECT plan FROM meal_plans WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let Some((document,)) = row else {
            return Ok(None);
        };
        match serde_json::from_value(document) {
            Ok(plan) => Ok(Some(plan)),
            Err(e) => {
                warn!(error = %e, %user_id, "stored meal plan has an unknown shape");
                Ok(None)
            }
        }
    }

    async fn upsert_plan(&self, user_id: &str, plan: &StoredMealPlan) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meal_plans (user_id, plan, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id)
            DO UPDATE SET plan = EXCLUDED.plan, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(sqlx::types::Json(plan))
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
