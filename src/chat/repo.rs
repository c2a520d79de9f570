use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::MacroRecord;
use crate::db::PgStore;

/// Calories eaten since the start of the day, and the goal they count against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyIntake {
    pub today_calories: f64,
    pub daily_goal: i32,
}

#[async_trait]
pub trait MealLogStore: Send + Sync {
    async fn ensure_user(&self, user_id: &str, default_goal: i32) -> anyhow::Result<()>;

    async fn daily_goal(&self, user_id: &str) -> anyhow::Result<Option<i32>>;

    /// Appends `meal` to the user's log, creating the user if needed, and
    /// stores the calories logged since `since` as their daily total.
    async fn record_meal(
        &self,
        user_id: &str,
        meal: &MacroRecord,
        since: OffsetDateTime,
        default_goal: i32,
    ) -> anyhow::Result<DailyIntake>;
}

#[async_trait]
impl MealLogStore for PgStore {
    async fn ensure_user(&self, user_id: &str, default_goal: i32) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO coach_users (user_id, daily_goal)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(default_goal)
        .execute(&self.db)
        .await
        .context("ensure coach user")?;
        Ok(())
    }

    async fn daily_goal(&self, user_id: &str) -> anyhow::Result<Option<i32>> {
        let row = sqlx::query_as::<_, (i32,)>(
            r#"SELECT daily_goal FROM coach_users WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("load daily goal")?;
        Ok(row.map(|(goal,)| goal))
    }

    async fn record_meal(
        &self,
        user_id: &str,
        meal: &MacroRecord,
        since: OffsetDateTime,
        default_goal: i32,
    ) -> anyhow::Result<DailyIntake> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        sqlx::query(
            r#"
            INSERT INTO coach_users (user_id, daily_goal)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(default_goal)
        .execute(&mut *tx)
        .await
        .context("ensure coach user")?;

        sqlx::query(
            r#"
            INSERT INTO meal_logs (id, user_id, description, calories, protein, fat, carbs)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&meal.food)
        .bind(meal.calories)
        .bind(meal.protein)
        .bind(meal.fat)
        .bind(meal.carbs)
        .execute(&mut *tx)
        .await
        .context("insert meal log")?;

        let (today_calories,) = sqlx::query_as::<_, (f64,)>(
            r#"
            SELECT COALESCE(SUM(calories), 0)::float8
              FROM meal_logs
             WHERE user_id = $1 AND logged_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&mut *tx)
        .await
        .context("sum today's calories")?;

        let (daily_goal,) = sqlx::query_as::<_, (i32,)>(
            r#"
            UPDATE coach_users
               SET daily_calories = $2
             WHERE user_id = $1
            RETURNING daily_goal
            "#,
        )
        .bind(user_id)
        .bind(today_calories)
        .fetch_one(&mut *tx)
        .await
        .context("update daily calories")?;

        tx.commit().await.context("commit tx")?;

        Ok(DailyIntake {
            today_calories,
            daily_goal,
        })
    }
}
