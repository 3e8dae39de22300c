//! Wire DTOs for the backend REST API (spec.md §6). All JSON uses
//! snake_case field names; unknown fields are ignored on the engine side —
//! `serde`'s default behavior already gives us that.

use crate::domain::{Candidate, ConfigItem, EventType, PendingIntervention, UnitType};
use serde::{Deserialize, Serialize};

/// `GET /v1/dispatch/static` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticDataBundle {
    pub config: Vec<ConfigItem>,
    pub unit_types: Vec<UnitType>,
    pub event_types: Vec<EventType>,
    pub bases: Vec<crate::domain::Base>,
}

/// `GET /v1/interventions/{id}/candidates` response body.
///
/// Extends spec.md §6's literal `{event_severity, candidates}` shape with
/// the target event's recommended unit types: the scoring service's
/// capability-match term needs them for any per-intervention dispatch call,
/// including ad hoc callback-triggered ones that bypass the pending-list
/// endpoint (which is the only place spec.md's data model otherwise carries
/// this field). See DESIGN.md for the full rationale.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidatesBundle {
    pub event_severity: u32,
    #[serde(default)]
    pub recommended_unit_types: Vec<String>,
    pub candidates: Vec<Candidate>,
}

/// `GET /v1/dispatch/pending` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingInterventionsBundle {
    pub interventions: Vec<PendingIntervention>,
}

/// `POST /v1/interventions/{id}/assignments` request body.
#[derive(Debug, Clone, Serialize)]
pub struct AssignUnitRequest<'a> {
    pub unit_id: &'a str,
    pub role: &'a str,
}

/// `POST /v1/interventions/{id}/assignments` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignUnitResponse {
    pub id: String,
}

/// `PATCH /v1/assignments/{id}/status` request body.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentStatusRequest<'a> {
    pub status: &'a str,
}

/// `PATCH /v1/units/{id}/status` request body.
#[derive(Debug, Clone, Serialize)]
pub struct UnitStatusRequest<'a> {
    pub status: &'a str,
}
