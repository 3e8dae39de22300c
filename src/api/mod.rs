//! Callback Endpoint (spec.md §4.6): a minimal HTTP surface exposing health,
//! on-demand cache refresh, and per-intervention dispatch triggers.

pub mod handlers;
pub mod responses;
pub mod routes;
pub mod state;

pub use responses::ApiError;
pub use routes::build_router;
pub use state::AppState;
