//! Plain-text views of search results, movie details and the favorites list.

use crate::client::{DetailState, SearchState};
use crate::favorites::{FavoriteRecord, FavoritesStore};
use crate::images::{ImageConfig, PosterSize};
use crate::tmdb::MovieSummary;

pub fn display_year(movie: &MovieSummary) -> String {
    movie
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn favorite_marker(is_favorite: bool) -> &'static str {
    if is_favorite {
        "♥"
    } else {
        "♡"
    }
}

pub fn render_card(movie: &MovieSummary, is_favorite: bool, images: &ImageConfig) -> String {
    let mut out = format!(
        "{} [{}] {} ({})\n",
        favorite_marker(is_favorite),
        movie.id,
        movie.title,
        display_year(movie)
    );
    if let Some(url) = images.poster_url(movie.poster_path.as_deref(), PosterSize::Card) {
        out.push_str(&format!("    poster: {}\n", url));
    }
    if !movie.overview.is_empty() {
        out.push_str(&format!("    {}\n", movie.overview));
    }
    out
}

pub fn render_search(state: &SearchState, favorites: &FavoritesStore, images: &ImageConfig) -> String {
    match state {
        SearchState::Failed(message) => format!("{}\n", message),
        SearchState::Empty { .. } => {
            "No movies found\nTry searching with a different title\n".to_string()
        }
        SearchState::Results { movies, .. } => {
            let mut out = format!("Search Results ({})\n\n", movies.len());
            for movie in movies {
                out.push_str(&render_card(movie, favorites.is_favorite(movie.id), images));
                out.push('\n');
            }
            out
        }
    }
}

pub fn render_details(state: &DetailState, is_favorite: bool, images: &ImageConfig) -> String {
    let movie = match state {
        DetailState::Failed { message, .. } => return format!("{}\n", message),
        DetailState::Loaded(movie) => movie,
    };

    let mut out = format!("{} ({})\n", movie.title, display_year(movie));
    if let Some(runtime) = movie.runtime_minutes {
        out.push_str(&format!("Runtime: {} min\n", runtime));
    }
    if let Some(url) = images.poster_url(movie.poster_path.as_deref(), PosterSize::Card) {
        out.push_str(&format!("Poster: {}\n", url));
    }
    out.push_str(if is_favorite {
        "In your favorites\n"
    } else {
        "Not in your favorites\n"
    });
    if !movie.overview.is_empty() {
        out.push_str(&format!("\n{}\n", movie.overview));
    }
    out
}

fn render_favorite(record: &FavoriteRecord, images: &ImageConfig) -> String {
    let mut out = format!(
        "[{}] {} ({})\n",
        record.id(),
        record.movie.title,
        display_year(&record.movie)
    );
    if let Some(url) = images.poster_url(record.movie.poster_path.as_deref(), PosterSize::List) {
        out.push_str(&format!("    poster: {}\n", url));
    }
    match record.personal_rating {
        Some(rating) => out.push_str(&format!(
            "    rating: {} {} - {}\n",
            "*".repeat(rating.value() as usize),
            rating.value(),
            rating.label()
        )),
        None => out.push_str("    rating: not rated\n"),
    }
    if let Some(note) = record.personal_note.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("    note: {}\n", note));
    }
    if let Some(at) = record.favorited_at_utc() {
        out.push_str(&format!("    added: {}\n", at.format("%Y-%m-%d %H:%M")));
    }
    out
}

pub fn render_favorites(favorites: &FavoritesStore, images: &ImageConfig) -> String {
    if favorites.is_empty() {
        return "No favorites yet\nStart adding movies to your favorites list!\n".to_string();
    }

    let mut out = format!("My Favorites ({})\n\n", favorites.len());
    for record in favorites.list() {
        out.push_str(&render_favorite(record, images));
        out.push('\n');
    }
    out
}
