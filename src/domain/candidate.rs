//! Candidate units considered for a single dispatch decision, and their
//! scored counterparts (spec.md §3, §9).

use serde::{Deserialize, Serialize};

/// Whether a candidate is currently idle or tied to another intervention.
///
/// Modeled as an explicit tagged variant rather than nullable fields so the
/// preemption predicate in the scoring service is exhaustive (spec.md §9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Idle,
    Assigned {
        intervention_id: String,
        severity: u32,
        assignment_id: String,
    },
}

impl CandidateStatus {
    pub fn is_assigned(&self) -> bool {
        matches!(self, CandidateStatus::Assigned { .. })
    }

    pub fn current_severity(&self) -> Option<u32> {
        match self {
            CandidateStatus::Assigned { severity, .. } => Some(*severity),
            CandidateStatus::Idle => None,
        }
    }

    pub fn assignment_id(&self) -> Option<&str> {
        match self {
            CandidateStatus::Assigned { assignment_id, .. } => Some(assignment_id),
            CandidateStatus::Idle => None,
        }
    }
}

/// One unit considered for a given intervention. Travel time is supplied by
/// the backend and treated as authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub unit_id: String,
    pub call_sign: String,
    pub unit_type_code: String,
    pub status: CandidateStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub home_base_code: String,
    pub travel_seconds: u32,
    pub en_route_to_target: bool,
}

impl Candidate {
    /// True when the unit is sitting at its own home base (not already
    /// dispatched elsewhere and not en route); used by the coverage-penalty
    /// term, which is zero otherwise (spec.md §4.3).
    pub fn is_at_home_base(&self) -> bool {
        matches!(self.status, CandidateStatus::Idle) && !self.en_route_to_target
    }
}

/// Role assigned to a committed candidate: the first unit dispatched to an
/// intervention leads it, the rest support it (spec.md §4.4, §9 Open Question).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    Lead,
    Support,
}

impl AssignmentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentRole::Lead => "lead",
            AssignmentRole::Support => "support",
        }
    }
}

/// A candidate plus its computed cost. Ordered ascending by score: lower is
/// better, `f64::INFINITY` means disqualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub requires_preemption: bool,
}

impl ScoredCandidate {
    pub fn is_disqualified(&self) -> bool {
        self.score.is_infinite()
    }
}

/// A unit successfully committed to an intervention during one dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedUnit {
    pub unit_id: String,
    pub assignment_id: String,
    pub role: AssignmentRole,
}
