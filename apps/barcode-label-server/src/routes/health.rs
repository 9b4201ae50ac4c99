//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub publisher: &'static str,
    pub caption: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "barcode-label-server",
        publisher: state.labels().publisher().mode().as_str(),
        caption: state.config().label.caption,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
