//! Core error type for the konsulent services.
//!
//! `ServerError` is used throughout the core domain (roster fetch, filter,
//! summary generation). When the `axum` feature is enabled, it also
//! implements `IntoResponse` so it can be used directly as an axum handler
//! error type.

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Roster fetch failed: {0}")]
    Upstream(String),

    #[error("Summary generation failed: {0}")]
    Generation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Config(_)
            | ServerError::Upstream(_)
            | ServerError::Generation(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
