use crate::config::{AppConfig, StorageBackend};
use crate::storage::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match config.storage_backend {
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL not set")?;
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    warn!(error = %e, "migration failed; continuing");
                }

                Arc::new(PgDocumentStore::new(db)) as Arc<dyn DocumentStore>
            }
            StorageBackend::Memory => {
                warn!("using in-memory document store; data is lost on restart");
                Arc::new(MemoryDocumentStore::new()) as Arc<dyn DocumentStore>
            }
        };

        info!(backend = ?config.storage_backend, "state initialised");
        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            default_calorie_goal: crate::config::DEFAULT_CALORIE_GOAL,
        });

        Self::from_parts(config, Arc::new(MemoryDocumentStore::new()))
    }
}
