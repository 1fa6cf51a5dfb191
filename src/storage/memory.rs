use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repo::*;

/// Volatile storage, mostly useful in tests.
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }
}
