mod dto;
pub mod handlers;
mod repo;
pub mod services;

pub use dto::DailyGoal;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::goal_routes()
}
