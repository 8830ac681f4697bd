//! Error handling for the reporter API.
//!
//! Handlers return `Result<_, AppError>`. The conversion to an HTTP
//! response lives here so route code can use `?` on anything that
//! implements `Into<anyhow::Error>` and still produce a sensible
//! status code and JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_core::PulseError;
use serde_json::json;

/// Wrapper that lets handlers bubble any error up with `?`.
pub struct AppError(pub anyhow::Error);

/// Marker for 404 responses raised by handlers themselves.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

/// Marker for 409 responses raised by handlers themselves.
#[derive(Debug)]
struct ConflictError(String);

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConflictError {}

impl AppError {
    /// A 404 with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError(anyhow::Error::new(NotFoundError(msg.into())))
    }

    /// A 409 with the given message.
    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError(anyhow::Error::new(ConflictError(msg.into())))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<NotFoundError>().is_some() {
            StatusCode::NOT_FOUND
        } else if self.0.downcast_ref::<ConflictError>().is_some() {
            StatusCode::CONFLICT
        } else if let Some(err) = self.0.downcast_ref::<PulseError>() {
            match err {
                PulseError::EmptyRoster
                | PulseError::InvalidConfig(_)
                | PulseError::ConfigNotFound(_) => StatusCode::BAD_REQUEST,
                PulseError::Io(_) | PulseError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "error": format!("{:#}", self.0) }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
