use async_trait::async_trait;

/// Flat string key/value storage with the same shape as a browser's
/// `localStorage`: whole values are read and written per key.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
