//! Core data model shared by every component of the engine (spec.md §3).

pub mod candidate;
pub mod config;
pub mod intervention;
pub mod unit;

pub use candidate::{AssignmentRole, Candidate, CandidateStatus, CommittedUnit, ScoredCandidate};
pub use config::{ConfigItem, DispatchConfig};
pub use intervention::PendingIntervention;
pub use unit::{Base, EventType, UnitType};
