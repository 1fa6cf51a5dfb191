use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::tmdb::ErrorBody;

/// Errors the proxy reports to clients. Messages are deliberately generic;
/// the underlying cause is only logged.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Query parameter is required")]
    MissingQuery,
    #[error("Server configuration error")]
    NotConfigured,
    #[error("Failed to fetch movies")]
    SearchFailed,
    #[error("Failed to fetch movie details")]
    DetailsFailed,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingQuery => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
