use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::put,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{validate_base_goal, DailyGoal, SetGoalRequest};
use super::services;
use crate::{auth::AuthUser, day::parse_day, errors::internal, state::AppState};

pub fn goal_routes() -> Router<AppState> {
    Router::new().route("/days/:date/goal", put(put_goal))
}

#[instrument(skip(state, body))]
pub async fn put_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(body): Json<SetGoalRequest>,
) -> Result<Json<DailyGoal>, (StatusCode, String)> {
    let day = parse_day(&date)?;
    let base_goal = validate_base_goal(body.base_goal).map_err(|e| {
        warn!(error = %e, %user_id, %day, "goal rejected");
        e
    })?;

    let goal = services::set_base_goal(&state, user_id, day, base_goal)
        .await
        .map_err(internal)?;
    Ok(Json(goal))
}
