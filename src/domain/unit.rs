//! Reference tables held by the static-data cache: unit types, event types,
//! and bases (spec.md §3). These are treated as immutable between refreshes.

use serde::{Deserialize, Serialize};

/// A field-unit category (e.g. a fire-pumper-truck code), with the
/// capabilities it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub code: String,
    pub label: String,
    /// Capability tags this unit type offers (first-aid, heavy-rescue, etc).
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Nominal cruising speed in km/h, informational only — travel time is
    /// always authoritative from the backend.
    #[serde(default)]
    pub nominal_speed_kmh: Option<f64>,
}

/// An incident category, carrying the unit types it recommends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub code: String,
    pub label: String,
    /// Unit type codes recommended for this event type.
    #[serde(default)]
    pub recommended_unit_types: Vec<String>,
}

/// A physical base that hosts units when idle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub code: String,
    pub label: String,
    /// Minimum number of units this base aims to keep in reserve.
    #[serde(default)]
    pub reserve_target: u32,
}
