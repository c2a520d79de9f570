mod dto;
pub mod handlers;
pub mod model;
pub mod normalizer;
mod prompt;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::plan_routes())
}
