//! Dispatch Service (spec.md §4.4): orchestrates one dispatch decision for a
//! single intervention, and drives the periodic sweep over all pending ones.

use crate::cache::SharedCache;
use crate::domain::{AssignmentRole, Candidate, CommittedUnit, ScoredCandidate};
use crate::gateway::BackendGateway;
use crate::scoring::{score_candidate, ScoringContext};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub struct DispatchService {
    cache: SharedCache,
    gateway: Arc<dyn BackendGateway>,
}

impl DispatchService {
    pub fn new(cache: SharedCache, gateway: Arc<dyn BackendGateway>) -> Self {
        Self { cache, gateway }
    }

    /// Runs the full per-intervention algorithm (spec.md §4.4 steps 1-6) and
    /// returns every unit successfully committed.
    pub async fn dispatch_for_intervention(&self, intervention_id: &str) -> Vec<CommittedUnit> {
        let Some(result) = self.gateway.get_candidates(intervention_id).await else {
            tracing::warn!(intervention_id, "no candidates available; skipping dispatch");
            return Vec::new();
        };

        if result.candidates.is_empty() {
            tracing::info!(intervention_id, "no candidates returned");
            return Vec::new();
        }

        let config = self.cache.get_config();
        let known_base_codes: HashSet<String> = self.cache.get_bases().into_keys().collect();
        let idle_counts_by_base = idle_counts_by_base(&result.candidates);

        let ctx = ScoringContext {
            config: &config,
            target_severity: result.event_severity,
            recommended_unit_types: &result.recommended_unit_types,
            idle_counts_by_base: &idle_counts_by_base,
            known_base_codes: &known_base_codes,
        };

        let mut scored: Vec<ScoredCandidate> = result
            .candidates
            .iter()
            .map(|c| score_candidate(c, &ctx))
            .filter(|s| !s.is_disqualified())
            .collect();

        // Ascending by score; ties broken by travel time, then unit id
        // lexicographic (spec.md §4.4 step 3, §9 Open Question).
        scored.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.candidate.travel_seconds.cmp(&b.candidate.travel_seconds))
                .then_with(|| a.candidate.unit_id.cmp(&b.candidate.unit_id))
        });

        let max_examined = config.max_candidates_per_dispatch();
        let eligible_count = scored.len().min(max_examined);
        let k = (result.event_severity as usize).min(eligible_count);

        let mut committed = Vec::with_capacity(k);
        for (i, scored_candidate) in scored.into_iter().take(k).enumerate() {
            let role = if i == 0 { AssignmentRole::Lead } else { AssignmentRole::Support };
            if let Some(unit) = self.commit(intervention_id, &scored_candidate, role).await {
                committed.push(unit);
            }
        }

        committed
    }

    /// Releases any existing preempted assignment, then assigns the
    /// candidate to `intervention_id`. On any per-candidate failure, logs and
    /// returns `None` so the caller continues with the next candidate
    /// (spec.md §4.4 step 5).
    async fn commit(
        &self,
        intervention_id: &str,
        scored: &ScoredCandidate,
        role: AssignmentRole,
    ) -> Option<CommittedUnit> {
        let candidate = &scored.candidate;

        if scored.requires_preemption {
            if let Some(assignment_id) = candidate.status.assignment_id() {
                if !self.gateway.release_assignment(assignment_id).await {
                    tracing::warn!(
                        unit_id = %candidate.unit_id,
                        assignment_id,
                        "failed to release prior assignment; skipping candidate"
                    );
                    return None;
                }
            }
        }

        match self
            .gateway
            .assign_unit(intervention_id, &candidate.unit_id, role)
            .await
        {
            Some(assignment_id) => Some(CommittedUnit {
                unit_id: candidate.unit_id.clone(),
                assignment_id,
                role,
            }),
            None => {
                tracing::warn!(
                    unit_id = %candidate.unit_id,
                    intervention_id,
                    "assignment failed; candidate not committed"
                );
                None
            }
        }
    }

    /// Sweeps all pending interventions that still need units, invoking
    /// `dispatch_for_intervention` for each. A failure on one intervention
    /// never aborts the sweep (spec.md §4.4 "Periodic sweep").
    pub async fn periodic_dispatch(&self) -> usize {
        let Some(pending) = self.gateway.get_pending_interventions().await else {
            tracing::warn!("pending interventions unavailable; sweep skipped this cycle");
            return 0;
        };

        let mut total = 0;
        for intervention in pending.iter().filter(|p| p.needs_more_units()) {
            let committed = self
                .dispatch_for_intervention(&intervention.intervention_id)
                .await;
            total += committed.len();
        }
        total
    }
}

/// Approximates each base's idle-unit census from the candidate list itself
/// (spec.md §9 Open Question #2), rather than querying the backend for a
/// live count.
fn idle_counts_by_base(candidates: &[Candidate]) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for candidate in candidates {
        if candidate.is_at_home_base() {
            *counts.entry(candidate.home_base_code.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StaticDataCache;
    use crate::domain::{Base, Candidate, CandidateStatus, ConfigItem, PendingIntervention};
    use crate::gateway::{BackendGateway, CandidatesResult, StaticDataResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;

    struct MockBackendGateway {
        candidates: Mutex<HashMap<String, CandidatesResult>>,
        pending: Mutex<Option<Vec<PendingIntervention>>>,
        assign_calls: Mutex<Vec<(String, String, AssignmentRole)>>,
        release_calls: Mutex<Vec<String>>,
        next_assignment_id: Mutex<u32>,
        fail_release: Mutex<HashSet<String>>,
    }

    impl MockBackendGateway {
        fn new() -> Self {
            Self {
                candidates: Mutex::new(HashMap::new()),
                pending: Mutex::new(None),
                assign_calls: Mutex::new(Vec::new()),
                release_calls: Mutex::new(Vec::new()),
                next_assignment_id: Mutex::new(1),
                fail_release: Mutex::new(HashSet::new()),
            }
        }

        fn seed_candidates(&self, intervention_id: &str, result: CandidatesResult) {
            self.candidates
                .lock()
                .insert(intervention_id.to_string(), result);
        }

        fn seed_pending(&self, interventions: Vec<PendingIntervention>) {
            *self.pending.lock() = Some(interventions);
        }
    }

    #[async_trait]
    impl BackendGateway for MockBackendGateway {
        async fn get_static_data(&self) -> Option<StaticDataResult> {
            None
        }

        async fn get_candidates(&self, intervention_id: &str) -> Option<CandidatesResult> {
            self.candidates.lock().get(intervention_id).cloned()
        }

        async fn get_pending_interventions(&self) -> Option<Vec<PendingIntervention>> {
            self.pending.lock().clone()
        }

        async fn assign_unit(
            &self,
            intervention_id: &str,
            unit_id: &str,
            role: AssignmentRole,
        ) -> Option<String> {
            self.assign_calls
                .lock()
                .push((intervention_id.to_string(), unit_id.to_string(), role));
            let mut next = self.next_assignment_id.lock();
            let id = format!("ASG-{next}");
            *next += 1;
            Some(id)
        }

        async fn release_assignment(&self, assignment_id: &str) -> bool {
            self.release_calls.lock().push(assignment_id.to_string());
            !self.fail_release.lock().contains(assignment_id)
        }

        async fn update_unit_status(&self, _unit_id: &str, _status: &str) -> bool {
            true
        }
    }

    fn idle(unit_id: &str, unit_type_code: &str, travel_seconds: u32, home_base: &str) -> Candidate {
        Candidate {
            unit_id: unit_id.to_string(),
            call_sign: unit_id.to_string(),
            unit_type_code: unit_type_code.to_string(),
            status: CandidateStatus::Idle,
            latitude: 0.0,
            longitude: 0.0,
            home_base_code: home_base.to_string(),
            travel_seconds,
            en_route_to_target: false,
        }
    }

    fn assigned(
        unit_id: &str,
        unit_type_code: &str,
        travel_seconds: u32,
        severity: u32,
        assignment_id: &str,
    ) -> Candidate {
        Candidate {
            status: CandidateStatus::Assigned {
                intervention_id: "ELSEWHERE".to_string(),
                severity,
                assignment_id: assignment_id.to_string(),
            },
            ..idle(unit_id, unit_type_code, travel_seconds, "B1")
        }
    }

    async fn cache_with_base(code: &str, reserve_target: u32) -> SharedCache {
        let cache = Arc::new(StaticDataCache::new());
        let gateway = MockBackendGateway::new();
        gateway.candidates.lock(); // no-op, just ensure type stays in scope
        let bundle = StaticDataResult {
            config: vec![],
            unit_types: vec![],
            event_types: vec![],
            bases: vec![Base {
                code: code.to_string(),
                label: code.to_string(),
                reserve_target,
            }],
        };
        struct OneShot(Mutex<Option<StaticDataResult>>);
        #[async_trait]
        impl BackendGateway for OneShot {
            async fn get_static_data(&self) -> Option<StaticDataResult> {
                self.0.lock().take()
            }
            async fn get_candidates(&self, _: &str) -> Option<CandidatesResult> {
                None
            }
            async fn get_pending_interventions(&self) -> Option<Vec<PendingIntervention>> {
                None
            }
            async fn assign_unit(&self, _: &str, _: &str, _: AssignmentRole) -> Option<String> {
                None
            }
            async fn release_assignment(&self, _: &str) -> bool {
                false
            }
            async fn update_unit_status(&self, _: &str, _: &str) -> bool {
                false
            }
        }
        let one_shot = OneShot(Mutex::new(Some(bundle)));
        cache.refresh(&one_shot).await;
        cache
    }

    fn pending(intervention_id: &str, severity: u32, assigned_count: u32) -> PendingIntervention {
        PendingIntervention {
            intervention_id: intervention_id.to_string(),
            event_id: "EVT-1".to_string(),
            status: "open".to_string(),
            priority: 1,
            event_severity: severity,
            recommended_unit_types: vec![],
            target_latitude: 0.0,
            target_longitude: 0.0,
            assigned_count,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn s1_single_match_prefers_capability_over_travel_time() {
        let cache = cache_with_base("B1", 3).await;
        let gateway = Arc::new(MockBackendGateway::new());
        gateway.seed_candidates(
            "INT-1",
            CandidatesResult {
                event_severity: 1,
                recommended_unit_types: vec!["FPT".to_string()],
                candidates: vec![
                    // U1 is 30s farther but capability-matched: weight_capability_match
                    // (-50) outweighs the 30s travel-time gap (weight_travel_time 1.0),
                    // so U1 must still win on score.
                    idle("U1", "FPT", 120, "B1"),
                    idle("U2", "VSAV", 90, "B1"),
                ],
            },
        );

        let service = DispatchService::new(cache, gateway.clone());
        let committed = service.dispatch_for_intervention("INT-1").await;

        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].unit_id, "U1");
        assert_eq!(committed[0].role, AssignmentRole::Lead);
    }

    #[tokio::test]
    async fn s2_severity_driven_multi_dispatch_orders_lead_then_support() {
        let cache = cache_with_base("B1", 0).await;
        let gateway = Arc::new(MockBackendGateway::new());
        gateway.seed_candidates(
            "INT-1",
            CandidatesResult {
                event_severity: 3,
                recommended_unit_types: vec![],
                candidates: vec![
                    idle("U1", "FPT", 50, "B1"),
                    idle("U2", "FPT", 60, "B1"),
                    idle("U3", "FPT", 70, "B1"),
                ],
            },
        );

        let service = DispatchService::new(cache, gateway.clone());
        let committed = service.dispatch_for_intervention("INT-1").await;

        assert_eq!(committed.len(), 3);
        assert_eq!(committed[0].unit_id, "U1");
        assert_eq!(committed[0].role, AssignmentRole::Lead);
        assert_eq!(committed[1].unit_id, "U2");
        assert_eq!(committed[1].role, AssignmentRole::Support);
        assert_eq!(committed[2].unit_id, "U3");
        assert_eq!(committed[2].role, AssignmentRole::Support);
    }

    #[tokio::test]
    async fn s3_preemption_allowed_releases_then_assigns() {
        let cache = cache_with_base("B1", 0).await;
        let gateway = Arc::new(MockBackendGateway::new());
        gateway.seed_candidates(
            "INT-1",
            CandidatesResult {
                event_severity: 3,
                recommended_unit_types: vec![],
                candidates: vec![assigned("U1", "FPT", 40, 1, "ASG-OLD")],
            },
        );

        let service = DispatchService::new(cache, gateway.clone());
        let committed = service.dispatch_for_intervention("INT-1").await;

        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].unit_id, "U1");
        assert_eq!(gateway.release_calls.lock().as_slice(), ["ASG-OLD"]);
        assert_eq!(gateway.assign_calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn s4_preemption_denied_yields_no_assignment() {
        let cache = cache_with_base("B1", 0).await;
        let gateway = Arc::new(MockBackendGateway::new());
        gateway.seed_candidates(
            "INT-1",
            CandidatesResult {
                event_severity: 2,
                recommended_unit_types: vec![],
                candidates: vec![assigned("U1", "FPT", 40, 2, "ASG-OLD")],
            },
        );

        let service = DispatchService::new(cache, gateway.clone());
        let committed = service.dispatch_for_intervention("INT-1").await;

        assert!(committed.is_empty());
        assert!(gateway.release_calls.lock().is_empty());
        assert!(gateway.assign_calls.lock().is_empty());
    }

    #[tokio::test]
    async fn s5_backend_outage_yields_empty_result() {
        let cache = cache_with_base("B1", 0).await;
        let gateway = Arc::new(MockBackendGateway::new());
        // No candidates seeded for INT-404: get_candidates returns None.

        let service = DispatchService::new(cache, gateway.clone());
        let committed = service.dispatch_for_intervention("INT-404").await;

        assert!(committed.is_empty());
    }

    #[tokio::test]
    async fn sweep_is_bounded_and_skips_satisfied_interventions() {
        let cache = cache_with_base("B1", 0).await;
        let gateway = Arc::new(MockBackendGateway::new());
        gateway.seed_pending(vec![pending("INT-1", 1, 0), pending("INT-2", 2, 2)]);
        gateway.seed_candidates(
            "INT-1",
            CandidatesResult {
                event_severity: 1,
                recommended_unit_types: vec![],
                candidates: vec![idle("U1", "FPT", 30, "B1")],
            },
        );

        let service = DispatchService::new(cache, gateway.clone());
        let total = service.periodic_dispatch().await;

        assert_eq!(total, 1);
        assert!(!gateway.candidates.lock().contains_key("INT-2"));
    }

    #[tokio::test]
    async fn failed_release_skips_candidate_without_assigning() {
        let cache = cache_with_base("B1", 0).await;
        let gateway = Arc::new(MockBackendGateway::new());
        gateway
            .fail_release
            .lock()
            .insert("ASG-OLD".to_string());
        gateway.seed_candidates(
            "INT-1",
            CandidatesResult {
                event_severity: 3,
                recommended_unit_types: vec![],
                candidates: vec![assigned("U1", "FPT", 40, 1, "ASG-OLD")],
            },
        );

        let service = DispatchService::new(cache, gateway.clone());
        let committed = service.dispatch_for_intervention("INT-1").await;

        assert!(committed.is_empty());
        assert!(gateway.assign_calls.lock().is_empty());
    }
}
