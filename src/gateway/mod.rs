//! Backend Gateway (spec.md §4.1): the only component that talks to the
//! backend REST service. Every call is synchronous request/reply — modeled
//! here as an `async fn` whose single `.await` is the suspension point
//! required by spec.md §5 — and every failure is absorbed into an absent
//! result rather than thrown, so the caller decides policy.

pub mod auth;
pub mod client;
pub mod models;

use crate::domain::{AssignmentRole, Candidate, PendingIntervention};
use async_trait::async_trait;
use thiserror::Error;

pub use auth::{OidcConfig, TokenProvider};
pub use client::ReqwestBackendGateway;

/// Abstract taxonomy of gateway failures (spec.md §7). Not returned to
/// callers of [`BackendGateway`] — it exists so the gateway's own
/// implementation has a typed vocabulary to log against.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Candidates plus the target event's severity, as returned by
/// `GET /v1/interventions/{id}/candidates`. The backend's ordering is not
/// trusted — the scoring service re-ranks.
#[derive(Debug, Clone)]
pub struct CandidatesResult {
    pub event_severity: u32,
    pub recommended_unit_types: Vec<String>,
    pub candidates: Vec<Candidate>,
}

/// Static reference data fetched in one shot from `GET /v1/dispatch/static`.
#[derive(Debug, Clone)]
pub struct StaticDataResult {
    pub config: Vec<crate::domain::ConfigItem>,
    pub unit_types: Vec<crate::domain::UnitType>,
    pub event_types: Vec<crate::domain::EventType>,
    pub bases: Vec<crate::domain::Base>,
}

/// The capability surface the rest of the engine needs from the backend.
/// Production code uses [`ReqwestBackendGateway`]; tests substitute an
/// in-memory double (see `dispatch::tests::MockBackendGateway`).
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn get_static_data(&self) -> Option<StaticDataResult>;

    async fn get_candidates(&self, intervention_id: &str) -> Option<CandidatesResult>;

    async fn get_pending_interventions(&self) -> Option<Vec<PendingIntervention>>;

    async fn assign_unit(
        &self,
        intervention_id: &str,
        unit_id: &str,
        role: AssignmentRole,
    ) -> Option<String>;

    async fn release_assignment(&self, assignment_id: &str) -> bool;

    async fn update_unit_status(&self, unit_id: &str, status: &str) -> bool;
}
