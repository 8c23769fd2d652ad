//! report-embed: turn project reports into embedding vectors.
//!
//! A thin pipeline with two working parts and a feature-gated HTTP surface:
//!
//! - [`extract_embedding_text`]: deterministic report → text transform
//! - [`EmbeddingClient`]: one provider call per request behind a bounded
//!   retry policy for transient failures
//! - [`server`] (feature `server`): the axum service wiring both together
//!
//! ```no_run
//! use report_embed::{embed_report, EmbeddingClient, EmbeddingConfig};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), report_embed::EmbedError> {
//! let client = EmbeddingClient::new(EmbeddingConfig {
//!     api_key: "sk-...".into(),
//!     ..Default::default()
//! })?;
//!
//! let report = json!({ "overview": { "summary": "A music archive backend" } });
//! let vector = embed_report(&client, &report).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod retry;
#[cfg(feature = "server")]
pub mod server;

pub use client::EmbeddingClient;
pub use config::EmbeddingConfig;
pub use error::EmbedError;
pub use extract::extract_embedding_text;
pub use retry::{RetryConfig, RetryOutcome};

use serde_json::Value;

/// Run the full report → vector pipeline.
///
/// Extracts the embeddable text and rejects reports whose extracted text is
/// empty after trimming (whitespace-only text counts as empty), then hands
/// the text to the embedding client.
pub async fn embed_report(
    client: &EmbeddingClient,
    report: &Value,
) -> Result<Vec<f32>, EmbedError> {
    let text = extract_embedding_text(report);
    if text.trim().is_empty() {
        return Err(EmbedError::EmptyInput);
    }
    tracing::debug!(text_len = text.len(), "extracted embeddable text");

    client.create_embedding(&text).await
}
