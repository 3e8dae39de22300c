//! Handlers backing the callback endpoint (spec.md §4.6).

use super::responses::ApiError;
use super::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// `GET /health`. Always 200; the payload distinguishes an uninitialized
/// cache from a healthy one.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    if state.cache.is_initialized() {
        Json(json!({ "status": "healthy" }))
    } else {
        Json(json!({ "status": "initializing" }))
    }
}

/// `POST /refresh`. Triggers an immediate cache refresh.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.cache.refresh(state.gateway.as_ref()).await;
    Ok(Json(json!({ "status": "refreshed" })))
}

/// `POST /dispatch/{interventionId}`. Triggers an ad hoc dispatch for one
/// intervention; `interventionId` must be non-empty (spec.md §4.6).
pub async fn dispatch_intervention(
    State(state): State<Arc<AppState>>,
    Path(intervention_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if intervention_id.trim().is_empty() {
        return Err(ApiError::EndpointMisuse(
            "interventionId must not be empty".to_string(),
        ));
    }

    let committed = state
        .dispatch
        .dispatch_for_intervention(&intervention_id)
        .await;

    Ok(Json(json!({ "status": "dispatched", "count": committed.len() })))
}

/// Fallback for `/health` requests made with anything other than `GET`.
pub async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}
