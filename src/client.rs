//! Embedding provider client.
//!
//! One HTTP call per `create_embedding` invocation, wrapped in the bounded
//! retry policy from [`crate::retry`]. Transient failures (rate limiting,
//! transport errors) are retried; everything else propagates on first
//! occurrence.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EmbeddingConfig;
use crate::error::EmbedError;
use crate::retry::retry_with_backoff;

/// Connect timeout, separate from the overall per-request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of a provider error body carried into error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Wire request for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Wire response: one embedding per input.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

/// Client for the external embedding provider.
///
/// Holds the pooled HTTP client and the immutable provider config. Cloning
/// is cheap; clones share the connection pool and are safe to use from
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    http: reqwest::Client,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    /// Build a client, validating the configuration first.
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbedError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| EmbedError::Unexpected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Provider config this client was built with.
    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Convert `text` into an embedding vector.
    ///
    /// Callers hand in non-empty text; the client does not re-validate.
    /// Rate-limit and connection failures are retried with exponential
    /// backoff up to the configured attempt budget, then the last error
    /// propagates. Any other provider error fails immediately.
    pub async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        debug!(
            model = %self.config.model,
            text_len = text.len(),
            "requesting embedding"
        );

        let outcome = retry_with_backoff(&self.config.retry, EmbedError::is_retryable, |_attempt| {
            let http = self.http.clone();
            let config = self.config.clone();
            let text = text.to_owned();
            async move { request_embedding(&http, &config, &text).await }
        })
        .await;

        if outcome.attempts > 1 {
            info!(
                attempts = outcome.attempts,
                recovered = outcome.result.is_ok(),
                "embedding call settled after retries"
            );
        }
        outcome.into_result()
    }
}

/// Issue a single attempt against the provider and classify its failure.
async fn request_embedding(
    http: &reqwest::Client,
    config: &EmbeddingConfig,
    text: &str,
) -> Result<Vec<f32>, EmbedError> {
    let response = http
        .post(&config.api_url)
        .bearer_auth(&config.api_key)
        .json(&EmbeddingRequest {
            model: &config.model,
            input: text,
        })
        .send()
        .await
        .map_err(|e| EmbedError::ConnectionFailed(e.to_string()))?;

    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let body = response.text().await.unwrap_or_default();
        return Err(EmbedError::RateLimited(preview(&body)));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EmbedError::Provider(format!(
            "HTTP {status}: {}",
            preview(&body)
        )));
    }

    let parsed: EmbeddingResponse = response
        .json()
        .await
        .map_err(|e| EmbedError::Provider(format!("invalid response body: {e}")))?;

    let embedding = parsed
        .data
        .into_iter()
        .next()
        .map(|item| item.embedding)
        .ok_or_else(|| EmbedError::Provider("response contained no embedding".into()))?;

    if embedding.len() != config.dimension {
        warn!(
            expected = config.dimension,
            got = embedding.len(),
            "embedding dimension differs from configured expectation"
        );
    }

    Ok(embedding)
}

/// Truncate a provider body on a char boundary for error messages.
fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
