//! File serving routes
//!
//! Serves locally published PDFs back to clients. Only mounted when the
//! local publisher is active.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::ArtifactName;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new().route("/:name", get(serve_file))
}

/// Serve a file from the local artifact directory
async fn serve_file(State(state): State<AppState>, Path(name): Path<String>) -> Result<Response> {
    let dir = state
        .local_dir()
        .ok_or_else(|| AppError::NotFound("Local files are not enabled".to_string()))?;

    let name = ArtifactName::parse(&name)
        .ok_or_else(|| AppError::InvalidInput("Invalid file name".to_string()))?;

    let path = dir.join(name.as_str());
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File not found: {}", name)));
        }
        Err(e) => return Err(AppError::Internal(format!("Failed to read {}: {}", name, e))),
    };

    let content_type = mime_guess::from_path(name.as_str())
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", name),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}
