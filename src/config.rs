//! Embedding provider configuration.
//!
//! Read once at startup and shared read-only afterwards. Components receive
//! an explicitly constructed value at construction time; there is no global
//! configuration singleton.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::EmbedError;
use crate::retry::RetryConfig;

pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_DIMENSION: usize = 1536;
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/embeddings";

/// Provider settings for the embedding client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider credential, sent as a bearer token. Required.
    #[serde(default)]
    pub api_key: String,
    /// Embedding model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Vector length the configured model is expected to produce. Logged on
    /// mismatch, never enforced.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Embeddings endpoint. Point at any OpenAI-compatible server to swap
    /// providers, or at a local stub in tests.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Overall per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Backoff policy for transient provider failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            dimension: default_dimension(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

impl EmbeddingConfig {
    /// Build a config from the environment alone.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.overlay_env();
        config
    }

    /// Overlay the flat environment variables the service honors regardless
    /// of any config file: `OPENAI_API_KEY`, `OPENAI_BASE_URL`,
    /// `EMBEDDING_MODEL`, `EMBEDDING_DIMENSION`.
    pub fn overlay_env(&mut self) {
        if self.api_key.is_empty() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                self.api_key = key;
            }
        }
        if let Ok(base) = env::var("OPENAI_BASE_URL") {
            let base = base.trim();
            if !base.is_empty() {
                self.api_url = format!("{}/embeddings", base.trim_end_matches('/'));
            }
        }
        if let Ok(model) = env::var("EMBEDDING_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }
        if let Ok(dimension) = env::var("EMBEDDING_DIMENSION") {
            if let Ok(parsed) = dimension.parse() {
                self.dimension = parsed;
            }
        }
    }

    /// Reject configs the client cannot work with.
    pub fn validate(&self) -> Result<(), EmbedError> {
        if self.api_key.trim().is_empty() {
            return Err(EmbedError::InvalidConfig(
                "api_key is required (set OPENAI_API_KEY)".into(),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(EmbedError::InvalidConfig("api_url must not be empty".into()));
        }
        Ok(())
    }

    /// Per-request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
