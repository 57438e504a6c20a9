use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::docx::DocxError;

pub const INVALID_DOCUMENT_MESSAGE: &str = "Invalid file format. Please upload a .docx file.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(#[source] DocxError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Multipart rejected: {0}")]
    MultipartRejected(#[from] MultipartRejection),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::MultipartRejected(e) => e.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::InvalidDocument(_) => {
                ("INVALID_DOCUMENT", INVALID_DOCUMENT_MESSAGE.to_string())
            }
            AppError::Multipart(e) => (client_error_code(status), e.body_text()),
            AppError::MultipartRejected(e) => (client_error_code(status), e.body_text()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Request-shape failures are validation errors, except a body over the upload limit.
fn client_error_code(status: StatusCode) -> &'static str {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        "PAYLOAD_TOO_LARGE"
    } else {
        "VALIDATION_ERROR"
    }
}
