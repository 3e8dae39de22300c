//! Response/error types for the callback endpoint (spec.md §4.6, §7).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// The endpoint's abstract error taxonomy (spec.md §7): client misuse is a
/// 4xx with a small JSON body, anything else unexpected is a 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("endpoint misuse: {0}")]
    EndpointMisuse(String),
    #[error("internal failure: {0}")]
    Fatal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::EndpointMisuse(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Fatal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
