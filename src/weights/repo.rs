use anyhow::Context;
use time::Date;
use uuid::Uuid;

use super::dto::{WeightEntry, WeightPoint};
use crate::storage::{Collection, DocKey, DocumentStore};

pub async fn record(
    store: &dyn DocumentStore,
    user_id: Uuid,
    day: Date,
    entry: &WeightEntry,
) -> anyhow::Result<()> {
    let key = DocKey::new(Collection::Weights, user_id, day);
    let doc = serde_json::to_value(entry).context("encode weight entry")?;
    store.merge_write(&key, doc).await
}

/// Entries that fail to decode are skipped rather than failing the whole list.
pub async fn history(
    store: &dyn DocumentStore,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<WeightPoint>> {
    let rows = store.list(Collection::Weights, user_id, from, to).await?;
    let points = rows
        .into_iter()
        .filter_map(|(date, doc)| match serde_json::from_value::<WeightEntry>(doc) {
            Ok(e) => Some(WeightPoint {
                date,
                kg: e.kg,
                recorded_at: e.recorded_at,
            }),
            Err(err) => {
                tracing::warn!(error = %err, %user_id, %date, "skipping malformed weight entry");
                None
            }
        })
        .collect();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use serde_json::json;
    use time::{macros::date, OffsetDateTime};

    #[tokio::test]
    async fn history_returns_recorded_days_in_order() {
        let store = MemoryDocumentStore::new();
        let user = Uuid::new_v4();
        for (day, kg) in [(date!(2024 - 04 - 03), 71.0), (date!(2024 - 04 - 01), 72.0)] {
            let entry = WeightEntry {
                kg,
                recorded_at: OffsetDateTime::now_utc(),
            };
            record(&store, user, day, &entry).await.unwrap();
        }
        store
            .merge_write(
                &DocKey::new(Collection::Weights, user, date!(2024 - 04 - 02)),
                json!({"kg": "heavy"}),
            )
            .await
            .unwrap();

        let points = history(&store, user, date!(2024 - 04 - 01), date!(2024 - 04 - 30))
            .await
            .unwrap();
        let kgs: Vec<f64> = points.iter().map(|p| p.kg).collect();
        assert_eq!(kgs, vec![72.0, 71.0]);
    }

    #[tokio::test]
    async fn re_recording_a_day_overwrites_it() {
        let store = MemoryDocumentStore::new();
        let user = Uuid::new_v4();
        let day = date!(2024 - 04 - 05);
        for kg in [80.0, 79.4] {
            let entry = WeightEntry {
                kg,
                recorded_at: OffsetDateTime::now_utc(),
            };
            record(&store, user, day, &entry).await.unwrap();
        }
        let points = history(&store, user, day, day).await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].kg, 79.4);
    }
}
