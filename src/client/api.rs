use std::time::Duration;

use async_trait::async_trait;

use crate::tmdb::{MovieSummary, SearchResults};

/// What a session needs from the metadata proxy.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ClientError>;
    async fn details(&self, id: i64) -> Result<MovieSummary, ClientError>;
}

/// HTTP client for the proxy's `/api/search` and `/api/movie/:id`.
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(ClientError::Request)?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        response.json::<T>().await.map_err(ClientError::Request)
    }
}

#[async_trait]
impl MovieSource for ProxyClient {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ClientError> {
        let url = format!("{}/api/search", self.base_url);
        let results: SearchResults = self.get(&url, &[("query", query)]).await?;
        Ok(results.results)
    }

    async fn details(&self, id: i64) -> Result<MovieSummary, ClientError> {
        let url = format!("{}/api/movie/{}", self.base_url, id);
        self.get(&url, &[]).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(reqwest::Error),
    #[error("Proxy returned status {0}")]
    Status(u16),
}
