use crate::chat::repo::MealLogStore;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::llm::{GeminiClient, TextGenerator};
use crate::plans::repo::PlanStore;
use crate::questionnaire::repo::ProfileStore;
use std::sync::Arc;

/// Everything handlers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub profiles: Arc<dyn ProfileStore>,
    pub plans: Arc<dyn PlanStore>,
    pub meal_log: Arc<dyn MealLogStore>,
    pub llm: Arc<dyn TextGenerator>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = PgStore::connect(&config).await?;
        // Run migrations if present
        if let Err(e) = store.migrate().await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
        let store = Arc::new(store);

        let llm = Arc::new(GeminiClient::new(&config.gemini)?) as Arc<dyn TextGenerator>;

        Ok(Self::from_parts(
            config,
            store.clone(),
            store.clone(),
            store,
            llm,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        profiles: Arc<dyn ProfileStore>,
        plans: Arc<dyn PlanStore>,
        meal_log: Arc<dyn MealLogStore>,
        llm: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            profiles,
            plans,
            meal_log,
            llm,
        }
    }
}
