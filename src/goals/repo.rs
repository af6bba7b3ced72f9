use anyhow::Context;
use serde_json::Value;
use time::Date;
use uuid::Uuid;

use super::dto::DailyGoal;
use crate::storage::{Collection, DocKey, DocumentStore};

pub const BASE_GOAL: &str = "base_goal";
pub const CONSUMED: &str = "consumed";
pub const CURRENT_SMP: &str = "current_smp";

/// Written with every patch; `remaining` is recomputed on read anyway.
const ALWAYS_WRITTEN: [&str; 2] = ["remaining", "updated_at"];

pub async fn find(
    store: &dyn DocumentStore,
    user_id: Uuid,
    day: Date,
) -> anyhow::Result<Option<DailyGoal>> {
    let key = DocKey::new(Collection::Goals, user_id, day);
    match store.read(&key).await? {
        Some(doc) => Ok(Some(
            serde_json::from_value(doc).context("decode daily goal")?,
        )),
        None => Ok(None),
    }
}

pub async fn save(
    store: &dyn DocumentStore,
    user_id: Uuid,
    day: Date,
    goal: &DailyGoal,
) -> anyhow::Result<()> {
    let key = DocKey::new(Collection::Goals, user_id, day);
    let doc = serde_json::to_value(goal).context("encode daily goal")?;
    store.merge_write(&key, doc).await
}

/// Writes only `fields` (plus the derived keys), so concurrent writers that
/// touch different fields do not revert each other.
pub async fn save_fields(
    store: &dyn DocumentStore,
    user_id: Uuid,
    day: Date,
    goal: &DailyGoal,
    fields: &[&str],
) -> anyhow::Result<()> {
    let Value::Object(mut doc) = serde_json::to_value(goal).context("encode daily goal")? else {
        anyhow::bail!("daily goal did not encode as an object");
    };
    doc.retain(|k, _| fields.contains(&k.as_str()) || ALWAYS_WRITTEN.contains(&k.as_str()));

    let key = DocKey::new(Collection::Goals, user_id, day);
    store.merge_write(&key, Value::Object(doc)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use time::macros::date;

    #[tokio::test]
    async fn writers_of_different_fields_do_not_revert_each_other() {
        let store = MemoryDocumentStore::new();
        let user = Uuid::new_v4();
        let day = date!(2024 - 07 - 01);
        save(&store, user, day, &DailyGoal::new(2000.0)).await.unwrap();

        // Both read the same version before either writes.
        let mut goal_edit = find(&store, user, day).await.unwrap().unwrap();
        let mut meal_save = find(&store, user, day).await.unwrap().unwrap();

        goal_edit.set_base_goal(1500.0).unwrap();
        save_fields(&store, user, day, &goal_edit, &[BASE_GOAL])
            .await
            .unwrap();

        meal_save.set_consumed(700.0);
        meal_save.set_current_smp(81);
        save_fields(&store, user, day, &meal_save, &[CONSUMED, CURRENT_SMP])
            .await
            .unwrap();

        let stored = find(&store, user, day)
            .await
            .unwrap()
            .unwrap()
            .normalized(2000.0);
        assert_eq!(stored.base_goal(), 1500.0);
        assert_eq!(stored.consumed(), 700.0);
        assert_eq!(stored.remaining(), 800.0);
        assert_eq!(stored.current_smp(), Some(81));
    }

    #[tokio::test]
    async fn save_fields_leaves_other_keys_alone() {
        let store = MemoryDocumentStore::new();
        let user = Uuid::new_v4();
        let day = date!(2024 - 07 - 02);
        let mut goal = DailyGoal::new(2000.0);
        goal.set_consumed(300.0);
        save(&store, user, day, &goal).await.unwrap();

        let mut other = DailyGoal::new(9999.0);
        other.set_current_smp(40);
        save_fields(&store, user, day, &other, &[CURRENT_SMP])
            .await
            .unwrap();

        let doc = store
            .read(&DocKey::new(Collection::Goals, user, day))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["base_goal"], 2000.0);
        assert_eq!(doc["consumed"], 300.0);
        assert_eq!(doc["current_smp"], 40);
    }
}
