use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{InternalErrorResponse, ValidationErrorResponse};
use thiserror::Error;
use tracing::error;

/// Errors surfaced by REST handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request rejected before reaching the domain; carries `field: message` clauses
    #[error("validation failed: {0}")]
    Validation(String),

    /// Anything else. Logged in full, answered with an opaque body.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse { error: message }),
            )
                .into_response(),
            ApiError::Internal(err) => {
                error!("Unhandled error while processing request: {:?}", err);
                internal_error_response()
            }
        }
    }
}

/// The 500 response; never includes internal detail
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalErrorResponse::generic()),
    )
        .into_response()
}
