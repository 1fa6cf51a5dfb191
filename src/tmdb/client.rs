use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::config::TmdbConfig;

/// Client for the upstream movie metadata API. Holds the API key so that
/// it never has to leave the server.
pub struct TmdbClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: Option<String>,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(TmdbError::Client)?;

        Ok(Self {
            http,
            api_key: non_empty(config.api_key.as_deref()),
            base_url: non_empty(config.base_url.as_deref()),
            language: config.language.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.base_url.is_some()
    }

    fn credentials(&self) -> Result<(&str, &str), TmdbError> {
        match (self.api_key.as_deref(), self.base_url.as_deref()) {
            (Some(key), Some(base)) => Ok((key, base)),
            _ => Err(TmdbError::NotConfigured),
        }
    }

    /// `GET {base}/search/movie`, body returned as-is.
    pub async fn search(&self, query: &str) -> Result<Value, TmdbError> {
        let (api_key, base_url) = self.credentials()?;
        let url = search_url(base_url);
        debug!(url = %url, query = query, "Searching movies upstream");

        self.get_json(&url, &[
            ("api_key", api_key),
            ("query", query),
            ("language", self.language.as_str()),
        ])
        .await
    }

    /// `GET {base}/movie/{id}`, body returned as-is.
    pub async fn movie(&self, id: &str) -> Result<Value, TmdbError> {
        let (api_key, base_url) = self.credentials()?;
        let url = movie_url(base_url, id);
        debug!(url = %url, "Fetching movie details upstream");

        self.get_json(&url, &[("api_key", api_key), ("language", self.language.as_str())])
            .await
    }

    async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, TmdbError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(TmdbError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(TmdbError::Request)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn search_url(base_url: &str) -> String {
    format!("{}/search/movie", base_url.trim_end_matches('/'))
}

pub fn movie_url(base_url: &str, id: &str) -> String {
    format!(
        "{}/movie/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("Metadata API key or base URL not configured")]
    NotConfigured,
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Upstream request failed: {0}")]
    Request(reqwest::Error),
    #[error("Upstream returned status {0}")]
    Status(u16),
}
