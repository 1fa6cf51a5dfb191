use tracing::{debug, warn};

use super::api::MovieSource;
use super::sequence::RequestSlot;
use crate::favorites::{now_millis, FavoriteRecord, FavoriteUpdate, FavoritesError, FavoritesStore, Rating};
use crate::tmdb::MovieSummary;

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch movies. Please try again.";
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to load movie details. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Results { query: String, movies: Vec<MovieSummary> },
    Empty { query: String },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loaded(MovieSummary),
    Failed { id: i64, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Favorites(#[from] FavoritesError),
    #[error("{0}")]
    Fetch(&'static str),
}

/// One user's explorer session: the favorites store plus the latest search
/// and detail results. Search and detail requests can overlap; only the most
/// recently issued one of each kind is ever shown.
pub struct ExplorerSession<S> {
    source: S,
    favorites: FavoritesStore,
    search: RequestSlot<SearchState>,
    details: RequestSlot<DetailState>,
}

impl<S: MovieSource> ExplorerSession<S> {
    pub fn new(source: S, favorites: FavoritesStore) -> Self {
        Self {
            source,
            favorites,
            search: RequestSlot::new(),
            details: RequestSlot::new(),
        }
    }

    /// Run a search. Blank queries are ignored. Returns whether this
    /// search's outcome became the current search state.
    pub async fn search(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        let ticket = self.search.issue();
        let state = match self.source.search(query).await {
            Ok(movies) if movies.is_empty() => SearchState::Empty {
                query: query.to_string(),
            },
            Ok(movies) => SearchState::Results {
                query: query.to_string(),
                movies,
            },
            Err(e) => {
                warn!(query = query, error = %e, "Search error");
                SearchState::Failed(SEARCH_FAILED_MESSAGE.to_string())
            }
        };

        let applied = self.search.resolve(ticket, state).await;
        if !applied {
            debug!(query = query, "Discarding superseded search result");
        }
        applied
    }

    pub async fn search_state(&self) -> Option<SearchState> {
        self.search.current().await
    }

    /// Load the detail view for a movie. Returns whether this request's
    /// outcome became the current detail state.
    pub async fn open_details(&self, id: i64) -> bool {
        let ticket = self.details.issue();
        let state = match self.source.details(id).await {
            Ok(movie) => DetailState::Loaded(movie),
            Err(e) => {
                warn!(id = id, error = %e, "Movie details error");
                DetailState::Failed {
                    id,
                    message: DETAILS_FAILED_MESSAGE.to_string(),
                }
            }
        };

        let applied = self.details.resolve(ticket, state).await;
        if !applied {
            debug!(id = id, "Discarding superseded movie details");
        }
        applied
    }

    pub async fn detail_state(&self) -> Option<DetailState> {
        self.details.current().await
    }

    pub async fn close_details(&self) {
        self.details.clear().await;
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.is_favorite(id)
    }

    pub async fn toggle_favorite(&mut self, movie: &MovieSummary) -> bool {
        self.toggle_favorite_at(movie, now_millis()).await
    }

    pub async fn toggle_favorite_at(&mut self, movie: &MovieSummary, now_millis: i64) -> bool {
        self.favorites.toggle(movie, now_millis).await
    }

    /// Favorite a movie known only by id, fetching its details first.
    /// Returns false if it already was a favorite.
    pub async fn add_favorite_by_id(&mut self, id: i64) -> Result<bool, SessionError> {
        if self.favorites.is_favorite(id) {
            return Ok(false);
        }
        let movie = self.source.details(id).await.map_err(|e| {
            warn!(id = id, error = %e, "Movie details error");
            SessionError::Fetch(DETAILS_FAILED_MESSAGE)
        })?;
        Ok(self.favorites.add(FavoriteRecord::new(movie, now_millis())).await)
    }

    pub async fn remove_favorite(&mut self, id: i64) -> bool {
        self.favorites.remove(id).await
    }

    pub async fn rate(
        &mut self,
        id: i64,
        rating: Option<Rating>,
    ) -> Result<&FavoriteRecord, SessionError> {
        let update = match rating {
            Some(rating) => FavoriteUpdate::new().rating(rating),
            None => FavoriteUpdate::new().clear_rating(),
        };
        Ok(self.favorites.update(id, update).await?)
    }

    pub async fn annotate(
        &mut self,
        id: i64,
        note: Option<String>,
    ) -> Result<&FavoriteRecord, SessionError> {
        let update = match note {
            Some(note) => FavoriteUpdate::new().note(note),
            None => FavoriteUpdate::new().clear_note(),
        };
        Ok(self.favorites.update(id, update).await?)
    }
}
