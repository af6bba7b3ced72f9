use time::Date;
use tracing::info;
use uuid::Uuid;

use super::dto::{DayEstimate, DayMeals, DayView, MealSlot};
use super::repo;
use crate::goals;
use crate::scoring::{daily_score, score_items, FoodItem};
use crate::state::AppState;

pub fn estimate(meals: &DayMeals) -> DayEstimate {
    let per_slot = meals
        .slots
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(slot, items)| (*slot, score_items(items)))
        .collect();

    DayEstimate {
        score: daily_score(meals.slots.values()),
        consumed_kcal: meals.total_kcal(),
        per_slot,
    }
}

/// The day as the client shows it, with a freshly computed estimate.
pub async fn load_view(st: &AppState, user_id: Uuid, day: Date) -> anyhow::Result<DayView> {
    let meals = repo::load_day(st.store.as_ref(), user_id, day).await?;
    let goal = goals::services::get_or_create(st, user_id, day).await?;
    let estimate = estimate(&meals);
    Ok(DayView {
        date: day,
        meals,
        goal,
        estimate,
    })
}

/// Day score from what is stored right now, without writing anything.
pub async fn fresh_score(st: &AppState, user_id: Uuid, day: Date) -> anyhow::Result<u8> {
    let meals = repo::load_day(st.store.as_ref(), user_id, day).await?;
    Ok(daily_score(meals.slots.values()))
}

/// Replaces a slot, then persists the day's consumption and SMP.
pub async fn save_slot(
    st: &AppState,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
    items: Vec<FoodItem>,
) -> anyhow::Result<DayView> {
    repo::write_slot(st.store.as_ref(), user_id, day, slot, &items).await?;

    let meals = repo::load_day(st.store.as_ref(), user_id, day).await?;
    let estimate = estimate(&meals);
    let goal = goals::services::record_consumption(
        st,
        user_id,
        day,
        estimate.consumed_kcal,
        estimate.score,
    )
    .await?;

    info!(
        %user_id, %day, %slot,
        items = items.len(),
        smp = estimate.score,
        consumed = estimate.consumed_kcal,
        "meal slot saved"
    );

    Ok(DayView {
        date: day,
        meals,
        goal,
        estimate,
    })
}

pub async fn clear_slot(
    st: &AppState,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
) -> anyhow::Result<DayView> {
    save_slot(st, user_id, day, slot, Vec::new()).await
}
