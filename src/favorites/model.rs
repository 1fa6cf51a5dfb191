use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tmdb::MovieSummary;

/// Personal rating, 1 to 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, FavoritesError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(FavoritesError::InvalidRating(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Poor",
            2 => "Fair",
            3 => "Good",
            4 => "Great",
            _ => "Excellent",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = FavoritesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

/// A favorited movie: the summary as it was when favorited, plus the
/// user's own annotations. Field names on disk match the browser app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(rename = "personalRating")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_rating: Option<Rating>,
    #[serde(rename = "personalNote")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_note: Option<String>,
    #[serde(rename = "favoritedAt")]
    pub favorited_at: i64,
}

impl FavoriteRecord {
    pub fn new(movie: MovieSummary, favorited_at: i64) -> Self {
        Self {
            movie,
            personal_rating: None,
            personal_note: None,
            favorited_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.movie.id
    }

    pub fn favorited_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.favorited_at)
    }
}

/// Partial update for a favorite. `None` leaves a field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteUpdate {
    pub personal_rating: Option<Option<Rating>>,
    pub personal_note: Option<Option<String>>,
}

impl FavoriteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rating(mut self, rating: Rating) -> Self {
        self.personal_rating = Some(Some(rating));
        self
    }

    pub fn clear_rating(mut self) -> Self {
        self.personal_rating = Some(None);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.personal_note = Some(Some(note.into()));
        self
    }

    pub fn clear_note(mut self) -> Self {
        self.personal_note = Some(None);
        self
    }

    pub fn apply_to(&self, record: &mut FavoriteRecord) {
        if let Some(rating) = self.personal_rating {
            record.personal_rating = rating;
        }
        if let Some(ref note) = self.personal_note {
            record.personal_note = note.clone();
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Favorite not found: {0}")]
    NotFound(i64),
    #[error("Invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),
}
