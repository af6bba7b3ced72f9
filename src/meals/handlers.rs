use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{DayView, MealSlot, SaveSlotRequest};
use super::services;
use crate::{auth::AuthUser, day::parse_day, errors::internal, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/days/:date", get(get_day))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/days/:date/meals/:slot", put(put_slot).delete(delete_slot))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DayView>, (StatusCode, String)> {
    let day = parse_day(&date)?;
    let view = services::load_view(&state, user_id, day)
        .await
        .map_err(internal)?;
    Ok(Json(view))
}

#[instrument(skip(state, body), fields(items = body.items.len()))]
pub async fn put_slot(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((date, slot)): Path<(String, String)>,
    Json(body): Json<SaveSlotRequest>,
) -> Result<Json<DayView>, (StatusCode, String)> {
    let day = parse_day(&date)?;
    let slot: MealSlot = slot.parse()?;
    let view = services::save_slot(&state, user_id, day, slot, body.items)
        .await
        .map_err(internal)?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn delete_slot(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((date, slot)): Path<(String, String)>,
) -> Result<Json<DayView>, (StatusCode, String)> {
    let day = parse_day(&date)?;
    let slot: MealSlot = slot.parse()?;
    let view = services::clear_slot(&state, user_id, day, slot)
        .await
        .map_err(internal)?;
    Ok(Json(view))
}
