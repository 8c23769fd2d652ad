//! HTTP endpoint implementations.
//!
//! - `embed`: the core report → vector endpoint
//! - `health`: liveness and readiness probes

pub mod embed;
pub mod health;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::server::error::ServerError;

/// Root endpoint: service name, version and surface.
pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "name": "report-embed",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/embed", "/health", "/ready"],
    }))
}

/// Fallback for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
