//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for every server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application-level error types
///
/// Client input problems surface as 400 with their detail. Everything else is
/// reported to the caller as an opaque 500; the detail only goes to the log.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body or path parameter failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Path matched a route that does not accept this method
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Record store operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::InvalidInput(detail) => {
                tracing::debug!(error = %detail, "Rejected request input");
                detail.clone()
            }
            AppError::MethodNotAllowed(_) => self.to_string(),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
