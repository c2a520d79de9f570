use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::state::AppState;

pub fn llm_routes() -> Router<AppState> {
    Router::new().route("/test-gemini", get(test_gemini))
}

/// Round-trip a fixed greeting through the text generator.
#[instrument(skip(state))]
pub async fn test_gemini(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.llm.generate("Hello from Gemini! How are you?").await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "success": true, "reply": reply }))),
        Err(e) => {
            error!(error = %e, "gemini test failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
        }
    }
}
