pub mod db;

use async_trait::async_trait;
use botstate_core::{now, BotRecord, BotStore, StoreError};
use db::DbError;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Timestamp { .. } => StoreError::InvalidRecord(e.to_string()),
            other => StoreError::Storage(other.to_string()),
        }
    }
}

/// A SQLite-backed bot store.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone)]
pub struct SqliteBotStore {
    pub pool: SqlitePool,
}

impl SqliteBotStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database at `path` and create the schema if absent.
    ///
    /// Call once at startup and hand the store to whatever serves requests.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(db::path_options(path.as_ref())).await
    }

    /// Like [`SqliteBotStore::open`], but takes a `sqlite://` URL (or a bare path).
    pub async fn open_url(url: &str) -> Result<Self, StoreError> {
        Self::open_with(db::url_options(url)?).await
    }

    async fn open_with(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        let path = options.get_filename().to_path_buf();
        let pool = db::connect(options).await?;
        db::run_migrations(&pool).await?;
        tracing::info!(path = %path.display(), "Bot store ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl BotStore for SqliteBotStore {
    async fn get_bot(&self, id: i64) -> Result<Option<BotRecord>, StoreError> {
        Ok(db::get_bot(&self.pool, id).await?)
    }

    async fn set_bot_state(&self, id: i64, is_on: bool) -> Result<BotRecord, StoreError> {
        let record = db::upsert_bot(&self.pool, id, is_on, now()).await?;
        tracing::info!(id, is_on, "Bot state set");
        Ok(record)
    }

    async fn list_bots(&self) -> Result<Vec<BotRecord>, StoreError> {
        Ok(db::list_bots(&self.pool).await?)
    }
}
