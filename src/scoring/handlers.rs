use std::collections::BTreeMap;

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{aggregate, daily_score, score_meal, FoodItem, MealMetrics};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreMealRequest {
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

#[derive(Debug, Serialize)]
pub struct ScoreMealResponse {
    pub score: u8,
    pub reasons: Vec<String>,
    pub metrics: MealMetrics,
}

#[derive(Debug, Deserialize)]
pub struct ScoreDayRequest {
    #[serde(default)]
    pub meals: BTreeMap<String, Vec<FoodItem>>,
}

#[derive(Debug, Serialize)]
pub struct ScoreDayResponse {
    pub score: u8,
}

/// Stateless estimates; no identity needed.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/score/meal", post(score_meal_route))
        .route("/score/day", post(score_day_route))
}

#[instrument(skip(body), fields(items = body.items.len()))]
pub async fn score_meal_route(Json(body): Json<ScoreMealRequest>) -> Json<ScoreMealResponse> {
    let metrics = aggregate(&body.items);
    let scored = score_meal(&metrics);
    debug!(score = scored.score, "meal scored");
    Json(ScoreMealResponse {
        score: scored.score,
        reasons: scored.reasons,
        metrics,
    })
}

#[instrument(skip(body), fields(slots = body.meals.len()))]
pub async fn score_day_route(Json(body): Json<ScoreDayRequest>) -> Json<ScoreDayResponse> {
    let score = daily_score(body.meals.values());
    debug!(score, "day scored");
    Json(ScoreDayResponse { score })
}
