//! Error types for the barcode label server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure to turn one code into a label page
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot encode {code:?} as Code-128: {reason}")]
    Encode { code: String, reason: String },

    #[error("cannot build label page for {code:?}: {reason}")]
    Pdf { code: String, reason: String },
}

impl RenderError {
    /// The code that failed to render
    pub fn code(&self) -> &str {
        match self {
            RenderError::Encode { code, .. } | RenderError::Pdf { code, .. } => code,
        }
    }
}

/// Failure to combine label pages into one document
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("nothing to merge")]
    Empty,

    #[error("label {index} is not a readable PDF: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("failed to serialize merged PDF: {0}")]
    Serialize(String),
}

/// Failure to store an artifact or produce its URL
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("upload of {key} failed: {reason}")]
    Upload { key: String, reason: String },

    #[error("signing URL for {key} failed: {reason}")]
    Sign { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Render(e) => {
                tracing::error!(stage = "render", code = %e.code(), "{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate barcode for code {:?}", e.code()),
                )
            }
            AppError::Merge(e) => {
                tracing::error!(stage = "merge", "{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to merge barcode pages".to_string(),
                )
            }
            AppError::Publish(e) => {
                tracing::error!(stage = "publish", "{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to publish PDF".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process request".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
