use time::Date;
use tracing::{debug, info};
use uuid::Uuid;

use super::dto::DailyGoal;
use super::repo;
use crate::state::AppState;

/// Reads the day's goal, creating it with the configured default on first access.
pub async fn get_or_create(st: &AppState, user_id: Uuid, day: Date) -> anyhow::Result<DailyGoal> {
    let default_goal = st.config.default_calorie_goal;
    if let Some(goal) = repo::find(st.store.as_ref(), user_id, day).await? {
        return Ok(goal.normalized(default_goal));
    }

    let goal = DailyGoal::new(default_goal);
    repo::save(st.store.as_ref(), user_id, day, &goal).await?;
    info!(%user_id, %day, base_goal = default_goal, "daily goal created");
    Ok(goal)
}

/// Stores the user's edited base goal. Callers validate with
/// [`validate_base_goal`](super::dto::validate_base_goal) first.
pub async fn set_base_goal(
    st: &AppState,
    user_id: Uuid,
    day: Date,
    base_goal: f64,
) -> anyhow::Result<DailyGoal> {
    let mut goal = get_or_create(st, user_id, day).await?;
    goal.set_base_goal(base_goal)?;
    repo::save_fields(st.store.as_ref(), user_id, day, &goal, &[repo::BASE_GOAL]).await?;
    info!(%user_id, %day, base_goal, "daily goal updated");
    Ok(goal)
}

/// Called after the day's meals change: consumed calories and the fresh SMP.
pub async fn record_consumption(
    st: &AppState,
    user_id: Uuid,
    day: Date,
    consumed: f64,
    smp: u8,
) -> anyhow::Result<DailyGoal> {
    let mut goal = get_or_create(st, user_id, day).await?;
    goal.set_consumed(consumed);
    goal.set_current_smp(smp);
    repo::save_fields(
        st.store.as_ref(),
        user_id,
        day,
        &goal,
        &[repo::CONSUMED, repo::CURRENT_SMP],
    )
    .await?;
    debug!(%user_id, %day, consumed, smp, remaining = goal.remaining(), "consumption recorded");
    Ok(goal)
}

/// Overrides the SMP only, e.g. after a symptom survey.
pub async fn set_current_smp(
    st: &AppState,
    user_id: Uuid,
    day: Date,
    smp: u8,
) -> anyhow::Result<DailyGoal> {
    let mut goal = get_or_create(st, user_id, day).await?;
    goal.set_current_smp(smp);
    repo::save_fields(st.store.as_ref(), user_id, day, &goal, &[repo::CURRENT_SMP]).await?;
    debug!(%user_id, %day, smp, "smp adjusted");
    Ok(goal)
}
