pub mod client;
pub mod config;
pub mod favorites;
pub mod images;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod render;
pub mod server;
pub mod storage;
pub mod tmdb;

#[cfg(test)]
mod testutil;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
    #[error("Metadata client error: {0}")]
    Tmdb(#[from] tmdb::TmdbError),
    #[error("Client error: {0}")]
    Client(#[from] client::ClientError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Run the metadata proxy until the listener fails.
pub async fn run(config: config::Config) -> Result<(), ServerError> {
    let addr: SocketAddr = config
        .listen_address()
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let state = server::AppState::new(&config)?;
    if !state.tmdb.is_configured() {
        warn!(
            "{} or {} not set, all proxy requests will fail",
            config::ENV_API_KEY,
            config::ENV_BASE_URL
        );
    }
    let app = server::build_router(state);

    if let (Some(cert_path), Some(key_path)) = (&config.listen.tlscert, &config.listen.tlskey) {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}

/// Open local storage, load the favorites and connect to the proxy.
pub async fn open_session(
    config: &config::Config,
) -> Result<client::ExplorerSession<client::ProxyClient>, ServerError> {
    let storage = Arc::new(storage::SqliteStorage::open(&config.storage.path).await?);
    let favorites = favorites::FavoritesStore::load(storage, &config.storage.key).await;
    let proxy = client::ProxyClient::new(&config.client.server_url)?;
    Ok(client::ExplorerSession::new(proxy, favorites))
}
