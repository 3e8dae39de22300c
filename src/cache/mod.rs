//! Static Data Cache (spec.md §4.2): a thread-safe, refreshable reference
//! store. Readers never observe a half-applied refresh — a new snapshot is
//! built off to the side and swapped in under one exclusive lock acquisition.

use crate::domain::{Base, DispatchConfig, EventType, UnitType};
use crate::gateway::BackendGateway;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

struct CacheSnapshot {
    config: DispatchConfig,
    unit_types: HashMap<String, UnitType>,
    event_types: HashMap<String, EventType>,
    bases: HashMap<String, Base>,
    initialized: bool,
}

impl Default for CacheSnapshot {
    fn default() -> Self {
        Self {
            config: DispatchConfig::default(),
            unit_types: HashMap::new(),
            event_types: HashMap::new(),
            bases: HashMap::new(),
            initialized: false,
        }
    }
}

/// Holds [`DispatchConfig`] and the unit-type/event-type/base lookup tables.
/// A reader-writer lock lets any number of scoring reads proceed in
/// parallel with each other; a refresh takes the writer side exactly once,
/// for exactly as long as it takes to swap a fully-built snapshot in.
pub struct StaticDataCache {
    inner: RwLock<CacheSnapshot>,
}

impl Default for StaticDataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticDataCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CacheSnapshot::default()),
        }
    }

    /// Fetches a full static-data bundle via the gateway and, on success,
    /// replaces the cache atomically. On failure the existing cache (and its
    /// `initialized` flag) is left untouched — a failed refresh never
    /// regresses state (spec.md §4.2, testable property 6).
    pub async fn refresh(&self, gateway: &dyn BackendGateway) {
        let Some(bundle) = gateway.get_static_data().await else {
            tracing::warn!("static data refresh failed; keeping previous cache");
            return;
        };

        let snapshot = CacheSnapshot {
            config: DispatchConfig::from_items(&bundle.config),
            unit_types: bundle
                .unit_types
                .into_iter()
                .map(|u| (u.code.clone(), u))
                .collect(),
            event_types: bundle
                .event_types
                .into_iter()
                .map(|e| (e.code.clone(), e))
                .collect(),
            bases: bundle.bases.into_iter().map(|b| (b.code.clone(), b)).collect(),
            initialized: true,
        };

        *self.inner.write() = snapshot;
        tracing::info!("static data cache refreshed");
    }

    pub fn get_config(&self) -> DispatchConfig {
        self.inner.read().config.clone()
    }

    pub fn get_unit_types(&self) -> HashMap<String, UnitType> {
        self.inner.read().unit_types.clone()
    }

    pub fn get_event_types(&self) -> HashMap<String, EventType> {
        self.inner.read().event_types.clone()
    }

    pub fn get_bases(&self) -> HashMap<String, Base> {
        self.inner.read().bases.clone()
    }

    pub fn get_base(&self, code: &str) -> Option<Base> {
        self.inner.read().bases.get(code).cloned()
    }

    /// Empty when the event type is unknown or carries no recommendation
    /// list (spec.md §4.2).
    pub fn get_recommended_unit_types(&self, event_type_code: &str) -> Vec<String> {
        self.inner
            .read()
            .event_types
            .get(event_type_code)
            .map(|e| e.recommended_unit_types.clone())
            .unwrap_or_default()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().initialized
    }
}

/// Convenience wrapper for sharing one cache across the scheduler, the
/// callback endpoint, and the dispatch service.
pub type SharedCache = Arc<StaticDataCache>;
