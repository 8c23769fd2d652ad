use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::EmbedError;

pub type ServerResult<T> = Result<T, ServerError>;

/// HTTP-boundary error types.
///
/// Every variant maps to a stable error code and a human-readable message;
/// raw underlying detail rides along only when the service runs in debug
/// mode and is never emitted otherwise.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("report contains no embeddable text")]
    EmptyText,

    #[error("report must be a JSON object")]
    InvalidReportFormat,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("embedding provider call failed")]
    Provider { detail: Option<String> },

    #[error("embedding generation failed")]
    Embedding { detail: Option<String> },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal server error")]
    Internal { detail: Option<String> },
}

impl ServerError {
    /// Classify a core pipeline error for the HTTP boundary.
    ///
    /// Transient provider failures arrive here only after the retry budget
    /// is spent; they fold into the single provider-error code. `detail`
    /// carries the raw error text only when `expose_detail` is set.
    pub fn from_embed(err: EmbedError, expose_detail: bool) -> Self {
        let detail = expose_detail.then(|| err.to_string());
        match err {
            EmbedError::EmptyInput => ServerError::EmptyText,
            EmbedError::RateLimited(_)
            | EmbedError::ConnectionFailed(_)
            | EmbedError::Provider(_) => ServerError::Provider { detail },
            EmbedError::InvalidConfig(message) => ServerError::Config(message),
            EmbedError::Unexpected(_) => ServerError::Embedding { detail },
        }
    }

    /// HTTP status code for this error.
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::EmptyText
            | ServerError::InvalidReportFormat
            | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Provider { .. }
            | ServerError::Embedding { .. }
            | ServerError::Config(_)
            | ServerError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code string.
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::EmptyText => "EMPTY_TEXT",
            ServerError::InvalidReportFormat => "INVALID_REPORT_FORMAT",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Provider { .. } => "PROVIDER_ERROR",
            ServerError::Embedding { .. } => "EMBEDDING_FAILED",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            ServerError::Provider { detail }
            | ServerError::Embedding { detail }
            | ServerError::Internal { detail } => detail.clone(),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        let detail = self.detail();

        // Client-input errors and server-side failures log at distinct
        // severities.
        if status.is_server_error() {
            tracing::error!(code, %status, detail = detail.as_deref().unwrap_or(""), "request failed");
        } else {
            tracing::warn!(code, %status, "request rejected");
        }

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(detail) = detail {
            error["detail"] = Value::String(detail);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<EmbedError> for ServerError {
    fn from(err: EmbedError) -> Self {
        // Conservative default: no detail exposure.
        ServerError::from_embed(err, false)
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("invalid address: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}
