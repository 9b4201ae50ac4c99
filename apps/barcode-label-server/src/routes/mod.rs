//! Route modules for the barcode label server

pub mod files;
pub mod health;
pub mod labels;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::storage::LOCAL_FILES_ROUTE;

/// Largest accepted request body (base64 PDFs for decoding): 25MB
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .nest("/health", health::router())
        .nest("/api/v1/health", health::router())
        .nest("/api", labels::router());

    if state.local_dir().is_some() {
        router = router.nest(LOCAL_FILES_ROUTE, files::router());
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
