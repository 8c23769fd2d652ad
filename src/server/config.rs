use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::config::EmbeddingConfig;

/// Service configuration, read once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB.
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// tracing env-filter directive, e.g. `info` or `report_embed=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// When true, raw underlying error text is attached to error payloads.
    /// Keep off outside development.
    #[serde(default)]
    pub debug: bool,

    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            log_level: default_log_level(),
            debug: false,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration.
    ///
    /// Sources, later ones winning: an optional `report-embed.*` config
    /// file, `REPORT_EMBED`-prefixed environment variables (`__` separates
    /// nesting, e.g. `REPORT_EMBED__EMBEDDING__MODEL`), and finally the flat
    /// variables the service has always honored: `OPENAI_API_KEY`,
    /// `OPENAI_BASE_URL`, `EMBEDDING_MODEL`, `EMBEDDING_DIMENSION`,
    /// `LOG_LEVEL`, `DEBUG`. The provider credential is validated here so a
    /// misconfigured service fails at boot, not on first request.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("report-embed").required(false))
            .add_source(config::Environment::with_prefix("REPORT_EMBED").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if let Ok(level) = env::var("LOG_LEVEL") {
            if !level.is_empty() {
                config.log_level = level;
            }
        }
        if let Ok(debug) = env::var("DEBUG") {
            config.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        config.embedding.overlay_env();
        config.embedding.validate()?;

        Ok(config)
    }

    /// Socket address to bind to.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr.parse()?)
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Maximum body size in bytes.
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size_mb, 2);
        assert_eq!(cfg.log_level, "info");
        assert!(!cfg.debug);
        assert_eq!(cfg.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_max_body_size_in_bytes() {
        let cfg = ServerConfig {
            max_body_size_mb: 3,
            ..Default::default()
        };
        assert_eq!(cfg.max_body_size(), 3 * 1024 * 1024);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let cfg: ServerConfig = serde_json::from_str(
            r#"{ "port": 9000, "embedding": { "api_key": "sk-x", "dimension": 768 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.bind_addr, "0.0.0.0");
        assert_eq!(cfg.embedding.dimension, 768);
        assert_eq!(cfg.embedding.model, "text-embedding-3-small");
    }
}
