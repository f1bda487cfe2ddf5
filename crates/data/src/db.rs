use botstate_core::{format_timestamp, parse_timestamp, BotRecord};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Errors raised by the SQLite layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad timestamp for bot {id}: {source}")]
    Timestamp {
        id: i64,
        #[source]
        source: chrono::ParseError,
    },
}

/// Connect options for a database file path.
pub fn path_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new().filename(path)
}

/// Connect options for a `sqlite://` / `sqlite:` URL or a bare file path.
pub fn url_options(url: &str) -> Result<SqliteConnectOptions, DbError> {
    Ok(SqliteConnectOptions::from_str(url)?)
}

/// Open (creating if needed) the database file and its parent directory.
pub async fn connect(options: SqliteConnectOptions) -> Result<SqlitePool, DbError> {
    let path = options.get_filename();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = options
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Run embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

fn row_to_record(row: &SqliteRow) -> Result<BotRecord, DbError> {
    let id: i64 = row.try_get("id")?;
    let is_on: bool = row.try_get("is_on")?;
    let updated_at: String = row.try_get("updated_at")?;
    let updated_at =
        parse_timestamp(&updated_at).map_err(|source| DbError::Timestamp { id, source })?;
    Ok(BotRecord::new(id, is_on, updated_at))
}

/// Load a single bot.
pub async fn get_bot(pool: &SqlitePool, id: i64) -> Result<Option<BotRecord>, DbError> {
    let row = sqlx::query("SELECT id, is_on, updated_at FROM bots WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_record).transpose()
}

/// Insert or overwrite a bot's state in one statement.
pub async fn upsert_bot(
    pool: &SqlitePool,
    id: i64,
    is_on: bool,
    updated_at: DateTime<Utc>,
) -> Result<BotRecord, DbError> {
    let record = BotRecord::new(id, is_on, updated_at);

    sqlx::query(
        "INSERT INTO bots (id, is_on, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (id) DO UPDATE
         SET is_on = excluded.is_on, updated_at = excluded.updated_at",
    )
    .bind(record.id)
    .bind(record.is_on)
    .bind(format_timestamp(&record.updated_at))
    .execute(pool)
    .await?;

    Ok(record)
}

/// Load all bots ordered by id.
pub async fn list_bots(pool: &SqlitePool) -> Result<Vec<BotRecord>, DbError> {
    let rows = sqlx::query("SELECT id, is_on, updated_at FROM bots ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn test_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let pool = connect(path_options(&dir.path().join("bots.db"))).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_upsert_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 30).unwrap();

        upsert_bot(&pool, 4, true, t1).await.unwrap();
        upsert_bot(&pool, 4, false, t2).await.unwrap();

        let all = list_bots(&pool).await.unwrap();
        assert_eq!(all, vec![BotRecord::new(4, false, t2)]);
    }

    #[tokio::test]
    async fn test_timestamp_stored_as_iso_text() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let ts = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        upsert_bot(&pool, 1, true, ts).await.unwrap();

        let raw: String = sqlx::query_scalar("SELECT updated_at FROM bots WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(raw, "2026-10-17T09:30:00Z");
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        sqlx::query("INSERT INTO bots (id, is_on, updated_at) VALUES (1, 0, 'yesterday')")
            .execute(&pool)
            .await
            .unwrap();

        let err = get_bot(&pool, 1).await.unwrap_err();
        assert!(matches!(err, DbError::Timestamp { id: 1, .. }));
    }

    #[tokio::test]
    async fn test_connect_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("bots.db");
        let pool = connect(path_options(&path)).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_url_options_strip_sqlite_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bots.db");

        let options = url_options(&format!("sqlite://{}", path.display())).unwrap();
        assert_eq!(options.get_filename(), path.as_path());

        let options = url_options(&format!("sqlite:{}", path.display())).unwrap();
        assert_eq!(options.get_filename(), path.as_path());

        let options = url_options(&path.display().to_string()).unwrap();
        assert_eq!(options.get_filename(), path.as_path());
    }
}
