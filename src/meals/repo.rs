use anyhow::Context;
use serde_json::{Map, Value};
use time::Date;
use uuid::Uuid;

use super::dto::{DayMeals, MealSlot};
use crate::scoring::FoodItem;
use crate::storage::{Collection, DocKey, DocumentStore};

pub async fn load_day(
    store: &dyn DocumentStore,
    user_id: Uuid,
    day: Date,
) -> anyhow::Result<DayMeals> {
    let key = DocKey::new(Collection::Meals, user_id, day);
    match store.read(&key).await? {
        Some(doc) => serde_json::from_value(doc).context("decode day meals"),
        None => Ok(DayMeals::default()),
    }
}

/// Replaces one slot; the other slots of the day are left as they are.
pub async fn write_slot(
    store: &dyn DocumentStore,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
    items: &[FoodItem],
) -> anyhow::Result<()> {
    let mut patch = Map::new();
    patch.insert(
        slot.as_str().to_string(),
        serde_json::to_value(items).context("encode meal items")?,
    );
    let key = DocKey::new(Collection::Meals, user_id, day);
    store.merge_write(&key, Value::Object(patch)).await
}
