use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::dto::{
    validate_kg, validate_range, HistoryQuery, RecordWeightRequest, WeightEntry, WeightPoint,
};
use super::repo;
use crate::{auth::AuthUser, day::parse_day, errors::internal, state::AppState};

pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/weights", get(list_weights))
        .route("/weights/:date", put(put_weight))
}

#[instrument(skip(state, body))]
pub async fn put_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(body): Json<RecordWeightRequest>,
) -> Result<Json<WeightPoint>, (StatusCode, String)> {
    let day = parse_day(&date)?;
    let kg = validate_kg(body.kg).map_err(|e| {
        warn!(error = %e, %user_id, "weight rejected");
        e
    })?;

    let entry = WeightEntry {
        kg,
        recorded_at: OffsetDateTime::now_utc(),
    };
    repo::record(state.store.as_ref(), user_id, day, &entry)
        .await
        .map_err(internal)?;

    info!(%user_id, %day, kg, "weight recorded");
    Ok(Json(WeightPoint {
        date: day,
        kg: entry.kg,
        recorded_at: entry.recorded_at,
    }))
}

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<WeightPoint>>, (StatusCode, String)> {
    let from = parse_day(&q.from)?;
    let to = parse_day(&q.to)?;
    validate_range(from, to)?;

    let points = repo::history(state.store.as_ref(), user_id, from, to)
        .await
        .map_err(internal)?;
    Ok(Json(points))
}
