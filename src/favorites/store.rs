use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::model::*;
use crate::storage::{KeyValueStorage, StorageResult};
use crate::tmdb::MovieSummary;

/// The user's favorites. Owns the in-memory collection and writes the whole
/// collection back to storage after every mutation.
///
/// Storage failures never reach the caller of a mutation: a failed read
/// yields an empty collection, a failed write is logged and the in-memory
/// state stays authoritative for the rest of the session.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    records: Vec<FavoriteRecord>,
}

impl FavoritesStore {
    pub async fn load(storage: Arc<dyn KeyValueStorage>, key: &str) -> Self {
        let records = match storage.get_item(key).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<FavoriteRecord>>(&blob) {
                Ok(records) => dedup_by_id(records),
                Err(e) => {
                    warn!(key = key, error = %e, "Stored favorites are unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read favorites, starting empty");
                Vec::new()
            }
        };

        debug!(key = key, count = records.len(), "Favorites loaded");

        Self {
            storage,
            key: key.to_string(),
            records,
        }
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    pub fn get(&self, id: i64) -> Option<&FavoriteRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn list(&self) -> &[FavoriteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record unless one with the same id exists. An existing
    /// record, including its timestamp, is left untouched.
    pub async fn add(&mut self, record: FavoriteRecord) -> bool {
        if self.is_favorite(record.id()) {
            return false;
        }
        self.records.push(record);
        self.persist().await;
        true
    }

    pub async fn remove(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        if self.records.len() == before {
            return false;
        }
        self.persist().await;
        true
    }

    pub async fn update(
        &mut self,
        id: i64,
        update: FavoriteUpdate,
    ) -> Result<&FavoriteRecord, FavoritesError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(FavoritesError::NotFound(id))?;

        update.apply_to(&mut self.records[index]);
        self.persist().await;

        Ok(&self.records[index])
    }

    /// Unfavorite the movie if it is a favorite, otherwise favorite it with
    /// the given timestamp. Returns whether it is a favorite afterwards.
    pub async fn toggle(&mut self, movie: &MovieSummary, now_millis: i64) -> bool {
        if self.remove(movie.id).await {
            false
        } else {
            self.add(FavoriteRecord::new(movie.clone(), now_millis)).await
        }
    }

    /// Write the full collection to storage.
    pub async fn save(&self) -> StorageResult<()> {
        let blob = serde_json::to_string(&self.records)?;
        self.storage.set_item(&self.key, &blob).await
    }

    async fn persist(&self) {
        if let Err(e) = self.save().await {
            error!(key = %self.key, error = %e, "Failed to persist favorites");
        }
    }
}

fn dedup_by_id(records: Vec<FavoriteRecord>) -> Vec<FavoriteRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, SqliteStorage, StorageError};
    use async_trait::async_trait;

    const KEY: &str = "movie-favorites";

    fn movie(id: i64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: None,
            release_date: "2010-07-15".to_string(),
            overview: String::new(),
            runtime_minutes: None,
        }
    }

    async fn empty_store() -> (Arc<MemoryStorage>, FavoritesStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = FavoritesStore::load(storage.clone(), KEY).await;
        (storage, store)
    }

    struct BrokenStorage;

    #[async_trait]
    impl KeyValueStorage for BrokenStorage {
        async fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        async fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        async fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_without_data_is_empty() {
        let (_, store) = empty_store().await;
        assert!(store.is_empty());
        assert!(!store.is_favorite(1));
    }

    #[tokio::test]
    async fn test_load_corrupt_data_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(KEY, "{not json").await.unwrap();
        let store = FavoritesStore::load(storage, KEY).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_read_failure_is_empty() {
        let store = FavoritesStore::load(Arc::new(BrokenStorage), KEY).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_is_favorite() {
        let (storage, mut store) = empty_store().await;
        assert!(store.add(FavoriteRecord::new(movie(1, "Inception"), 100)).await);
        assert!(store.is_favorite(1));

        let blob = storage.get_item(KEY).await.unwrap().unwrap();
        assert!(blob.contains("Inception"));
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (_, mut store) = empty_store().await;
        assert!(store.add(FavoriteRecord::new(movie(1, "Inception"), 100)).await);
        assert!(!store.add(FavoriteRecord::new(movie(1, "Inception"), 999)).await);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().favorited_at, 100);
    }

    #[tokio::test]
    async fn test_remove() {
        let (_, mut store) = empty_store().await;
        store.add(FavoriteRecord::new(movie(1, "Inception"), 100)).await;
        store.add(FavoriteRecord::new(movie(2, "Memento"), 200)).await;

        assert!(store.remove(1).await);
        assert!(!store.is_favorite(1));
        assert!(store.is_favorite(2));
        assert!(!store.remove(1).await);
    }

    #[tokio::test]
    async fn test_update_rating_keeps_other_fields() {
        let (_, mut store) = empty_store().await;
        let mut record = FavoriteRecord::new(movie(1, "Inception"), 100);
        record.personal_note = Some("dreams".to_string());
        store.add(record.clone()).await;

        let update = FavoriteUpdate::new().rating(Rating::new(4).unwrap());
        let updated = store.update(1, update).await.unwrap().clone();

        assert_eq!(updated.personal_rating.map(Rating::value), Some(4));
        assert_eq!(updated.movie, record.movie);
        assert_eq!(updated.personal_note, record.personal_note);
        assert_eq!(updated.favorited_at, record.favorited_at);
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let (storage, mut store) = empty_store().await;
        let result = store.update(7, FavoriteUpdate::new().note("x")).await;
        assert!(matches!(result, Err(FavoritesError::NotFound(7))));
        assert_eq!(storage.get_item(KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_toggle() {
        let (_, mut store) = empty_store().await;
        let inception = movie(1, "Inception");

        assert!(store.toggle(&inception, 500).await);
        let record = store.get(1).unwrap();
        assert_eq!(record.favorited_at, 500);
        assert_eq!(record.personal_rating, None);
        assert_eq!(record.personal_note, None);

        assert!(!store.toggle(&inception, 600).await);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let storage = Arc::new(SqliteStorage::in_memory().await.unwrap());
        let mut store = FavoritesStore::load(storage.clone(), KEY).await;
        store.add(FavoriteRecord::new(movie(1, "Inception"), 100)).await;
        store.add(FavoriteRecord::new(movie(2, "Memento"), 200)).await;
        store
            .update(2, FavoriteUpdate::new().rating(Rating::new(5).unwrap()).note("twisty"))
            .await
            .unwrap();
        store.save().await.unwrap();

        let reloaded = FavoritesStore::load(storage, KEY).await;
        assert_eq!(reloaded.list(), store.list());
    }

    #[tokio::test]
    async fn test_load_collapses_duplicate_ids() {
        let storage = Arc::new(MemoryStorage::new());
        let records = vec![
            FavoriteRecord::new(movie(1, "First"), 1),
            FavoriteRecord::new(movie(1, "Second"), 2),
        ];
        storage
            .set_item(KEY, &serde_json::to_string(&records).unwrap())
            .await
            .unwrap();

        let store = FavoritesStore::load(storage, KEY).await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().movie.title, "First");
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let mut store = FavoritesStore::load(Arc::new(BrokenStorage), KEY).await;
        assert!(store.add(FavoriteRecord::new(movie(1, "Inception"), 100)).await);
        assert!(store.is_favorite(1));
        assert!(store.save().await.is_err());

        store
            .update(1, FavoriteUpdate::new().note("still here"))
            .await
            .unwrap();
        assert_eq!(store.get(1).unwrap().personal_note.as_deref(), Some("still here"));
    }
}
