use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use time::Date;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Meals,
    Goals,
    Weights,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Meals => "meals",
            Collection::Goals => "goals",
            Collection::Weights => "weights",
        }
    }
}

/// One document per collection, user and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocKey {
    pub collection: Collection,
    pub user_id: Uuid,
    pub day: Date,
}

impl DocKey {
    pub fn new(collection: Collection, user_id: Uuid, day: Date) -> Self {
        Self {
            collection,
            user_id,
            day,
        }
    }
}

/// User- and date-scoped JSON documents.
///
/// `merge_write` replaces the top-level keys present in `patch` and leaves the
/// others alone; concurrent writers race and the last one wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self, key: &DocKey) -> anyhow::Result<Option<Value>>;
    async fn merge_write(&self, key: &DocKey, patch: Value) -> anyhow::Result<()>;
    /// Documents with `from <= day <= to`, ordered by day.
    async fn list(
        &self,
        collection: Collection,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<(Date, Value)>>;
}

fn ensure_object(patch: &Value) -> anyhow::Result<()> {
    anyhow::ensure!(patch.is_object(), "merge patch must be a JSON object");
    Ok(())
}

#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn read(&self, key: &DocKey) -> anyhow::Result<Option<Value>> {
        let row = sqlx::query_as::<_, (Value,)>(
            r#"
            SELECT body
              FROM documents
             WHERE collection = $1 AND user_id = $2 AND day = $3
            "#,
        )
        .bind(key.collection.as_str())
        .bind(key.user_id)
        .bind(key.day)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("read {} document", key.collection.as_str()))?;

        Ok(row.map(|(body,)| body))
    }

    async fn merge_write(&self, key: &DocKey, patch: Value) -> anyhow::Result<()> {
        ensure_object(&patch)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection, user_id, day, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, user_id, day)
            DO UPDATE SET body = documents.body || EXCLUDED.body,
                          updated_at = now()
            "#,
        )
        .bind(key.collection.as_str())
        .bind(key.user_id)
        .bind(key.day)
        .bind(patch)
        .execute(&self.db)
        .await
        .with_context(|| format!("merge {} document", key.collection.as_str()))?;

        debug!(
            collection = key.collection.as_str(),
            user_id = %key.user_id,
            day = %key.day,
            "document merged"
        );
        Ok(())
    }

    async fn list(
        &self,
        collection: Collection,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<(Date, Value)>> {
        let rows = sqlx::query_as::<_, (Date, Value)>(
            r#"
            SELECT day, body
              FROM documents
             WHERE collection = $1 AND user_id = $2 AND day BETWEEN $3 AND $4
             ORDER BY day ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .with_context(|| format!("list {} documents", collection.as_str()))?;

        Ok(rows)
    }
}

/// Process-local store with the same merge semantics as Postgres `jsonb || jsonb`.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<BTreeMap<DocKey, Map<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read(&self, key: &DocKey) -> anyhow::Result<Option<Value>> {
        let docs = self.docs.read().await;
        Ok(docs.get(key).cloned().map(Value::Object))
    }

    async fn merge_write(&self, key: &DocKey, patch: Value) -> anyhow::Result<()> {
        let Value::Object(fields) = patch else {
            anyhow::bail!("merge patch must be a JSON object");
        };
        let mut docs = self.docs.write().await;
        docs.entry(*key).or_default().extend(fields);
        Ok(())
    }

    async fn list(
        &self,
        collection: Collection,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<(Date, Value)>> {
        if from > to {
            return Ok(Vec::new());
        }
        let docs = self.docs.read().await;
        let lo = DocKey::new(collection, user_id, from);
        let hi = DocKey::new(collection, user_id, to);
        Ok(docs
            .range(lo..=hi)
            .map(|(k, body)| (k.day, Value::Object(body.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn key(collection: Collection, user_id: Uuid, day: Date) -> DocKey {
        DocKey::new(collection, user_id, day)
    }

    #[tokio::test]
    async fn merge_write_replaces_only_given_keys() {
        let store = MemoryDocumentStore::new();
        let user = Uuid::new_v4();
        let k = key(Collection::Meals, user, date!(2024 - 05 - 01));

        store
            .merge_write(&k, json!({"breakfast": [1], "lunch": [2]}))
            .await
            .unwrap();
        store.merge_write(&k, json!({"lunch": []})).await.unwrap();

        let doc = store.read(&k).await.unwrap().unwrap();
        assert_eq!(doc, json!({"breakfast": [1], "lunch": []}));
    }

    #[tokio::test]
    async fn read_missing_document_is_none() {
        let store = MemoryDocumentStore::new();
        let k = key(Collection::Goals, Uuid::new_v4(), date!(2024 - 05 - 01));
        assert!(store.read(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_object_patch_is_rejected() {
        let store = MemoryDocumentStore::new();
        let k = key(Collection::Goals, Uuid::new_v4(), date!(2024 - 05 - 01));
        let err = store.merge_write(&k, json!([1, 2])).await.unwrap_err();
        assert!(err.to_string().contains("JSON object"));
        assert!(store.read(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn documents_are_scoped_by_user_and_collection() {
        let store = MemoryDocumentStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let day = date!(2024 - 05 - 01);

        store
            .merge_write(&key(Collection::Goals, alice, day), json!({"base_goal": 1800}))
            .await
            .unwrap();

        assert!(store
            .read(&key(Collection::Goals, bob, day))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .read(&key(Collection::Meals, alice, day))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_is_inclusive_and_ordered() {
        let store = MemoryDocumentStore::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        for (day, kg) in [
            (date!(2024 - 03 - 03), 70.1),
            (date!(2024 - 03 - 01), 70.5),
            (date!(2024 - 03 - 05), 69.8),
            (date!(2024 - 03 - 09), 69.0),
        ] {
            store
                .merge_write(&key(Collection::Weights, user, day), json!({ "kg": kg }))
                .await
                .unwrap();
        }
        store
            .merge_write(
                &key(Collection::Weights, other, date!(2024 - 03 - 02)),
                json!({"kg": 90.0}),
            )
            .await
            .unwrap();

        let rows = store
            .list(
                Collection::Weights,
                user,
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 05),
            )
            .await
            .unwrap();
        let days: Vec<Date> = rows.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            days,
            vec![
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 03),
                date!(2024 - 03 - 05)
            ]
        );
    }
}
