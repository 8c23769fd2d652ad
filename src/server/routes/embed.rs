//! The core endpoint: report in, embedding vector out.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

/// Request body: the report document to embed.
#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub report: Value,
}

/// Response body: the embedding vector and its dimension.
#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub vector: Vec<f32>,
    pub dimension: usize,
}

/// Embed a project report.
///
/// Extracts the embeddable fields (`overview.summary`, `overview.mainTech`,
/// `projectInfo.techStack`, `keyImplementations[].title`), rejects reports
/// that yield no text, and returns the provider's vector. Transient provider
/// failures are retried inside the client before an error ever reaches this
/// handler.
pub async fn embed_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmbedRequest>,
) -> ServerResult<Json<EmbedResponse>> {
    if !request.report.is_object() {
        return Err(ServerError::InvalidReportFormat);
    }

    let vector = crate::embed_report(&state.embedder, &request.report)
        .await
        .map_err(|e| ServerError::from_embed(e, state.config.debug))?;

    info!(dimension = vector.len(), "embedding created");

    Ok(Json(EmbedResponse {
        dimension: vector.len(),
        vector,
    }))
}
