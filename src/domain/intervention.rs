//! Pending interventions that may still need more units (spec.md §3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingIntervention {
    pub intervention_id: String,
    pub event_id: String,
    pub status: String,
    pub priority: u32,
    /// Also used as the target number of units for this intervention.
    pub event_severity: u32,
    #[serde(default)]
    pub recommended_unit_types: Vec<String>,
    pub target_latitude: f64,
    pub target_longitude: f64,
    pub assigned_count: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PendingIntervention {
    /// Whether this intervention still needs more units dispatched to it.
    pub fn needs_more_units(&self) -> bool {
        self.assigned_count < self.event_severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(assigned: u32, severity: u32) -> PendingIntervention {
        PendingIntervention {
            intervention_id: "INT-1".to_string(),
            event_id: "EVT-1".to_string(),
            status: "open".to_string(),
            priority: 1,
            event_severity: severity,
            recommended_unit_types: vec![],
            target_latitude: 0.0,
            target_longitude: 0.0,
            assigned_count: assigned,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn needs_more_units_when_understaffed() {
        assert!(sample(1, 3).needs_more_units());
        assert!(!sample(3, 3).needs_more_units());
        assert!(!sample(4, 3).needs_more_units());
    }
}
