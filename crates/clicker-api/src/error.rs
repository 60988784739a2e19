//! Error types for the game API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! Unknown target ids and upgrade tags in commands are not errors: those
//! endpoints answer `200 {"success": false}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clicker_core::SaveError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Saving or loading the game failed.
    #[error(transparent)]
    Save(#[from] SaveError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Save(SaveError::Load(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Save(SaveError::Io { .. } | SaveError::Encode(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
