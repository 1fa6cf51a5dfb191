use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::tmdb::{TmdbClient, TmdbError};

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<TmdbClient>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, TmdbError> {
        let tmdb = TmdbClient::new(&config.tmdb)?;
        Ok(Self {
            tmdb: Arc::new(tmdb),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/search", get(crate::proxy::search_movies))
        .route("/api/movie/:id", get(crate::proxy::get_movie));

    Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(api_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
