use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use once_cell::sync::Lazy;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

use crate::server::state::AppState;

/// Server start time for uptime reporting.
static SERVER_START: Lazy<SystemTime> = Lazy::new(SystemTime::now);

/// Liveness probe. Returns 200 while the process is running.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "report-embed",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime(),
    }))
}

/// Readiness probe. The service is ready once it holds a usable provider
/// configuration, which is guaranteed after startup validation.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ready",
        "service": "report-embed",
        "model": state.embedder.config().model,
        "dimension": state.embedder.config().dimension,
        "uptime_seconds": uptime(),
    }))
}

fn uptime() -> u64 {
    SERVER_START.elapsed().map(|d| d.as_secs()).unwrap_or(0)
}
