use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::error::Error as StdError;
use thiserror::Error;

use crate::models::{ValidationError, validation_error_response};

/// Application error type covering everything a handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    // Validation errors are rendered verbatim
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Request parsing errors
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("invalid multipart payload: {0}")]
    Multipart(String),
}

/// Standard JSON error response structure
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Determines the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(err) => {
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            AppError::InvalidJson(_) | AppError::BodyRead(_) | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    fn log_error(&self) {
        match self.status_code() {
            code if code.is_client_error() => {
                tracing::warn!(
                    error = %self,
                    status_code = %code,
                    "Client error"
                );
            }
            code if code.is_server_error() => {
                tracing::error!(
                    error = %self,
                    status_code = %code,
                    source = ?self.source(),
                    "Server error"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log_error();

        if let AppError::Validation(err) = &self {
            return validation_error_response(err);
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
