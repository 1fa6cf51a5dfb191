use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::repo::*;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

/// Key/value storage in a local SQLite file.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn open(db_path: &str) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);
        let storage = Self::connect(options).await?;
        info!("Local storage opened at {}", db_path);
        Ok(storage)
    }

    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> StorageResult<Self> {
        // One connection: a single session owns the storage, and an in-memory
        // database only lives as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let row = sqlx::query_as::<_, (String,)>("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.0))
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        sqlx::query("INSERT OR REPLACE INTO local_storage (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
