//! Tunable dispatch weights and thresholds.
//!
//! `DispatchConfig` is a read-mostly mapping from a fixed set of keys to
//! floating-point values (spec.md §3). It is cheap to clone so the cache can
//! hand out independent snapshots to readers without holding a lock across
//! scoring.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recognized configuration keys, each with a documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKey {
    WeightTravelTime,
    WeightCoveragePenalty,
    WeightCapabilityMatch,
    WeightEnRouteProgress,
    WeightPreemptionDelta,
    WeightReassignmentCost,
    MinReservePerBase,
    PreemptionSeverityThreshold,
    MaxCandidatesPerDispatch,
}

impl ConfigKey {
    /// The wire/key name used by the backend's static-data bundle.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::WeightTravelTime => "weight_travel_time",
            ConfigKey::WeightCoveragePenalty => "weight_coverage_penalty",
            ConfigKey::WeightCapabilityMatch => "weight_capability_match",
            ConfigKey::WeightEnRouteProgress => "weight_en_route_progress",
            ConfigKey::WeightPreemptionDelta => "weight_preemption_delta",
            ConfigKey::WeightReassignmentCost => "weight_reassignment_cost",
            ConfigKey::MinReservePerBase => "min_reserve_per_base",
            ConfigKey::PreemptionSeverityThreshold => "preemption_severity_threshold",
            ConfigKey::MaxCandidatesPerDispatch => "max_candidates_per_dispatch",
        }
    }

    fn default_value(self) -> f64 {
        match self {
            ConfigKey::WeightTravelTime => 1.0,
            ConfigKey::WeightCoveragePenalty => 0.3,
            ConfigKey::WeightCapabilityMatch => -50.0,
            ConfigKey::WeightEnRouteProgress => 0.2,
            ConfigKey::WeightPreemptionDelta => -100.0,
            ConfigKey::WeightReassignmentCost => 60.0,
            ConfigKey::MinReservePerBase => 1.0,
            ConfigKey::PreemptionSeverityThreshold => 2.0,
            ConfigKey::MaxCandidatesPerDispatch => 10.0,
        }
    }

    const ALL: [ConfigKey; 9] = [
        ConfigKey::WeightTravelTime,
        ConfigKey::WeightCoveragePenalty,
        ConfigKey::WeightCapabilityMatch,
        ConfigKey::WeightEnRouteProgress,
        ConfigKey::WeightPreemptionDelta,
        ConfigKey::WeightReassignmentCost,
        ConfigKey::MinReservePerBase,
        ConfigKey::PreemptionSeverityThreshold,
        ConfigKey::MaxCandidatesPerDispatch,
    ];
}

/// A single `(key, value)` pair as returned by the backend's static-data bundle.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: f64,
}

/// Scoring weights and dispatch thresholds, with typed accessors over the
/// raw key/value map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    values: HashMap<String, f64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let values = ConfigKey::ALL
            .iter()
            .map(|k| (k.as_str().to_string(), k.default_value()))
            .collect();
        Self { values }
    }
}

impl DispatchConfig {
    /// Build a config from backend-supplied items, falling back to defaults
    /// for any key the backend omitted.
    pub fn from_items(items: &[ConfigItem]) -> Self {
        let mut config = Self::default();
        for item in items {
            config.values.insert(item.key.clone(), item.value);
        }
        config
    }

    fn get(&self, key: ConfigKey) -> f64 {
        self.values
            .get(key.as_str())
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    pub fn weight_travel_time(&self) -> f64 {
        self.get(ConfigKey::WeightTravelTime)
    }

    pub fn weight_coverage_penalty(&self) -> f64 {
        self.get(ConfigKey::WeightCoveragePenalty)
    }

    pub fn weight_capability_match(&self) -> f64 {
        self.get(ConfigKey::WeightCapabilityMatch)
    }

    pub fn weight_en_route_progress(&self) -> f64 {
        self.get(ConfigKey::WeightEnRouteProgress)
    }

    pub fn weight_preemption_delta(&self) -> f64 {
        self.get(ConfigKey::WeightPreemptionDelta)
    }

    pub fn weight_reassignment_cost(&self) -> f64 {
        self.get(ConfigKey::WeightReassignmentCost)
    }

    pub fn min_reserve_per_base(&self) -> u32 {
        self.get(ConfigKey::MinReservePerBase).max(0.0) as u32
    }

    pub fn preemption_severity_threshold(&self) -> u32 {
        self.get(ConfigKey::PreemptionSeverityThreshold).max(0.0) as u32
    }

    pub fn max_candidates_per_dispatch(&self) -> usize {
        self.get(ConfigKey::MaxCandidatesPerDispatch).max(0.0) as usize
    }
}
