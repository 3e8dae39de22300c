//! Route table for the callback endpoint (spec.md §4.6).

use super::handlers::{dispatch_intervention, health, method_not_allowed, refresh};
use super::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Builds the full router. `callback_worker_threads` bounds the number of
/// in-flight callback requests, modeling the "small pool of callback-handler
/// threads" described in spec.md §5 on top of Tokio's cooperative scheduler
/// rather than dedicating OS threads to it.
pub fn build_router(state: Arc<AppState>, callback_worker_threads: usize) -> Router {
    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/refresh", post(refresh))
        .route("/dispatch/:intervention_id", post(dispatch_intervention))
        .layer(ConcurrencyLimitLayer::new(callback_worker_threads.max(1)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
