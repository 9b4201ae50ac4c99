//! Label API routes
//!
//! Endpoints:
//! - POST /api/generate-pdf - codes -> PDF URL, or file -> decoded codes
//! - POST /api/v1/labels - codes -> PDF URL
//! - POST /api/v1/decode - file -> decoded codes
//!
//! Every other method on these paths is a plain-text 405.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::codes::{parse_codes_body, parse_file_body, parse_label_request, LabelRequest};
use crate::error::Result;
use crate::state::AppState;
use crate::storage::RequestOrigin;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    pub codes: Vec<String>,
}

/// Create the label router
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/generate-pdf",
            post(generate_or_decode).fallback(method_not_allowed),
        )
        .route("/v1/labels", post(generate).fallback(method_not_allowed))
        .route("/v1/decode", post(decode).fallback(method_not_allowed))
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// POST /api/generate-pdf
async fn generate_or_decode(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    match parse_label_request(&body)? {
        LabelRequest::Generate(codes) => {
            let artifact = state
                .labels()
                .generate(codes, request_origin(&headers))
                .await?;
            Ok(Json(GenerateResponse { url: artifact.url }).into_response())
        }
        LabelRequest::Decode(file) => {
            let codes = state.labels().decode(&file).await?;
            Ok(Json(DecodeResponse { codes }).into_response())
        }
    }
}

/// POST /api/v1/labels
async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GenerateResponse>> {
    let codes = parse_codes_body(&body)?;
    let artifact = state
        .labels()
        .generate(codes, request_origin(&headers))
        .await?;
    Ok(Json(GenerateResponse { url: artifact.url }))
}

/// POST /api/v1/decode
async fn decode(State(state): State<AppState>, body: Bytes) -> Result<Json<DecodeResponse>> {
    let file = parse_file_body(&body)?;
    let codes = state.labels().decode(&file).await?;
    Ok(Json(DecodeResponse { codes }))
}

/// Scheme and host the client used, honoring reverse-proxy headers
pub fn request_origin(headers: &HeaderMap) -> Option<RequestOrigin> {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let host = header_str("x-forwarded-host").or_else(|| header_str(header::HOST.as_str()))?;
    let scheme = header_str("x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    Some(RequestOrigin::new(scheme, host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_origin_from_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
        assert_eq!(
            request_origin(&headers),
            Some(RequestOrigin::new("http", "localhost:3000"))
        );
    }

    #[test]
    fn test_origin_prefers_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("10.0.0.5:3000"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("labels.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(
            request_origin(&headers),
            Some(RequestOrigin::new("https", "labels.example.com"))
        );
    }

    #[test]
    fn test_no_host_no_origin() {
        assert_eq!(request_origin(&HeaderMap::new()), None);
    }
}
