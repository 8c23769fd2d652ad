use std::sync::Arc;

use crate::client::EmbeddingClient;
use crate::server::config::ServerConfig;
use crate::server::error::ServerResult;

/// Shared application state: immutable config plus the provider client.
///
/// Nothing here is mutable after construction, so clones are safe across
/// concurrent requests without synchronization.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<ServerConfig>,

    /// Embedding provider client (pooled HTTP connections).
    pub embedder: EmbeddingClient,
}

impl AppState {
    /// Create the shared state, validating the provider config.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let embedder = EmbeddingClient::new(config.embedding.clone())?;
        Ok(Self {
            config: Arc::new(config),
            embedder,
        })
    }
}
