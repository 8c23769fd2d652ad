use thiserror::Error;

/// Errors surfaced by the extraction and embedding pipeline.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Extraction produced no usable text.
    #[error("report contains no embeddable text")]
    EmptyInput,
    /// The provider answered with a rate-limit response. Retryable.
    #[error("embedding provider rate limited the request: {0}")]
    RateLimited(String),
    /// The request never completed (connect failure, timeout, reset). Retryable.
    #[error("connection to embedding provider failed: {0}")]
    ConnectionFailed(String),
    /// Any other provider-side failure: bad status, malformed or empty body.
    #[error("embedding provider error: {0}")]
    Provider(String),
    /// Configuration is unusable (e.g. missing credential).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// Anything uncategorized in the pipeline.
    #[error("unexpected embedding failure: {0}")]
    Unexpected(String),
}

impl EmbedError {
    /// Transient failures worth retrying. Everything else fails fast.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbedError::RateLimited(_) | EmbedError::ConnectionFailed(_)
        )
    }
}
