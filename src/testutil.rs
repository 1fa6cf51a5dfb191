//! Helpers shared by tests: a stand-in for the upstream metadata API and a
//! running proxy in front of it.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::config::Config;
use crate::server::{build_router, AppState};

pub const FAKE_API_KEY: &str = "test-api-key";

fn inception() -> Value {
    json!({
        "id": 27205,
        "title": "Inception",
        "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
        "release_date": "2010-07-15",
        "overview": "Cobb, a skilled thief who commits corporate espionage by infiltrating the subconscious of his targets.",
        "vote_average": 8.4
    })
}

fn inception_documentary() -> Value {
    json!({
        "id": 613092,
        "title": "Inception: The Cobol Job",
        "poster_path": null,
        "release_date": "",
        "overview": ""
    })
}

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some(FAKE_API_KEY)
        && params.get("language").map(String::as_str) == Some("en-US")
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    if !authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let results = match params.get("query").map(String::as_str) {
        Some("Inception") => vec![inception(), inception_documentary()],
        _ => Vec::new(),
    };
    Ok(Json(json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": 2
    })))
}

async fn movie(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if id != "27205" {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut details = inception();
    details["runtime"] = json!(148);
    details["tagline"] = json!("Your mind is the scene of the crime.");
    Ok(Json(details))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Start a fake metadata API; returns its base URL.
pub async fn spawn_fake_tmdb() -> String {
    let router = Router::new()
        .route("/3/search/movie", get(search))
        .route("/3/movie/:id", get(movie));
    format!("{}/3", serve(router).await)
}

/// Start the proxy in front of a fake metadata API; returns the proxy URL.
pub async fn spawn_proxy() -> String {
    let mut config = Config::default();
    config.tmdb.api_key = Some(FAKE_API_KEY.to_string());
    config.tmdb.base_url = Some(spawn_fake_tmdb().await);
    let state = AppState::new(&config).unwrap();
    serve(build_router(state)).await
}
