use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::{apply, SurveyAnswers, SurveyOutcome};
use crate::{
    auth::AuthUser, day::parse_day, errors::internal, goals, meals, state::AppState,
};

pub fn survey_routes() -> Router<AppState> {
    Router::new().route("/days/:date/survey", post(submit_survey))
}

/// Baseline is recomputed from the stored meals, not taken from the
/// persisted SMP, so repeated submissions do not compound.
#[instrument(skip(state, answers))]
pub async fn submit_survey(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(answers): Json<SurveyAnswers>,
) -> Result<Json<SurveyOutcome>, (StatusCode, String)> {
    let day = parse_day(&date)?;
    let baseline = meals::services::fresh_score(&state, user_id, day)
        .await
        .map_err(internal)?;

    let outcome = apply(baseline, &answers);
    goals::services::set_current_smp(&state, user_id, day, outcome.adjusted)
        .await
        .map_err(internal)?;

    info!(%user_id, %day, baseline, adjusted = outcome.adjusted, "survey applied");
    Ok(Json(outcome))
}
