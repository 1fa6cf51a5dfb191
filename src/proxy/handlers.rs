use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use super::error::ProxyError;
use crate::server::AppState;
use crate::tmdb::TmdbError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// `GET /api/search?query=...`
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ProxyError> {
    if !state.tmdb.is_configured() {
        return Err(ProxyError::NotConfigured);
    }

    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ProxyError::MissingQuery)?;

    match state.tmdb.search(query).await {
        Ok(body) => Ok(Json(body)),
        Err(TmdbError::NotConfigured) => Err(ProxyError::NotConfigured),
        Err(e) => {
            error!(query = query, error = %e, "Search API error");
            Err(ProxyError::SearchFailed)
        }
    }
}

/// `GET /api/movie/:id`
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ProxyError> {
    match state.tmdb.movie(&id).await {
        Ok(body) => Ok(Json(body)),
        Err(TmdbError::NotConfigured) => Err(ProxyError::NotConfigured),
        Err(e) => {
            error!(id = %id, error = %e, "Movie details API error");
            Err(ProxyError::DetailsFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::server::{build_router, AppState};
    use crate::testutil::spawn_fake_tmdb;

    async fn get(config: Config, uri: &str) -> (StatusCode, Value) {
        let state = AppState::new(&config).unwrap();
        let response = build_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn configured() -> Config {
        let base_url = spawn_fake_tmdb().await;
        let mut config = Config::default();
        config.tmdb.api_key = Some(crate::testutil::FAKE_API_KEY.to_string());
        config.tmdb.base_url = Some(base_url);
        config
    }

    #[tokio::test]
    async fn test_missing_config() {
        let (status, body) = get(Config::default(), "/api/search?query=Inception").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Server configuration error" }));

        let (status, body) = get(Config::default(), "/api/movie/27205").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Server configuration error" }));
    }

    #[tokio::test]
    async fn test_search_relays_results() {
        let (status, body) = get(configured().await, "/api/search?query=%20Inception%20").await;
        assert_eq!(status, StatusCode::OK);

        let results = body["results"].as_array().unwrap();
        assert!(!results.is_empty());
        for movie in results {
            for field in ["id", "title", "poster_path", "release_date", "overview"] {
                assert!(movie.get(field).is_some(), "missing {}", field);
            }
        }
        assert_eq!(results[0]["title"], "Inception");
        // fields the proxy knows nothing about pass through untouched
        assert_eq!(body["total_pages"], 1);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let (status, body) = get(configured().await, "/api/search?query=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Query parameter is required" }));

        let (status, _) = get(configured().await, "/api/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let mut config = configured().await;
        config.tmdb.api_key = Some("wrong-key".to_string());
        let (status, body) = get(config, "/api/search?query=Inception").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch movies" }));
    }

    #[tokio::test]
    async fn test_movie_details() {
        let (status, body) = get(configured().await, "/api/movie/27205").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Inception");
        assert_eq!(body["runtime"], 148);
    }

    #[tokio::test]
    async fn test_movie_details_upstream_not_found() {
        let (status, body) = get(configured().await, "/api/movie/999").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch movie details" }));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let mut config = Config::default();
        config.tmdb.api_key = Some("key".to_string());
        config.tmdb.base_url = Some("http://127.0.0.1:1".to_string());
        let (status, body) = get(config, "/api/movie/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch movie details" }));
    }
}
