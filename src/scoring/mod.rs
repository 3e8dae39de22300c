//! Scoring Service (spec.md §4.3): a pure, stateless, deterministic cost
//! function over candidate units. Lower is better; disqualified candidates
//! carry the sentinel score [`DISQUALIFIED`].

use crate::domain::{Candidate, CandidateStatus, DispatchConfig, ScoredCandidate};
use std::collections::HashMap;

/// Sentinel score for a candidate the dispatch service must not select.
pub const DISQUALIFIED: f64 = f64::INFINITY;

/// Everything the scoring service needs beyond the candidate itself, all of
/// it read-only and already resolved by the caller — scoring never touches
/// the cache or gateway directly.
pub struct ScoringContext<'a> {
    pub config: &'a DispatchConfig,
    pub target_severity: u32,
    pub recommended_unit_types: &'a [String],
    /// Count of idle candidates currently homed at each base, used to
    /// approximate the post-dispatch reserve shortfall (spec.md §9 Open
    /// Question: approximated from the candidate list rather than a live
    /// backend census).
    pub idle_counts_by_base: &'a HashMap<String, u32>,
    /// Bases known to the static-data cache. A base absent here yields a
    /// zero coverage penalty regardless of occupancy (spec.md §4.3).
    pub known_base_codes: &'a std::collections::HashSet<String>,
}

/// Computes the cost of assigning `candidate` to the current target. Always
/// returns a value — disqualification is represented as
/// [`DISQUALIFIED`], never an error (spec.md §4.3 "Error conditions: none").
pub fn score_candidate(candidate: &Candidate, ctx: &ScoringContext) -> ScoredCandidate {
    let requires_preemption = candidate.status.is_assigned();

    let preemption_term = if requires_preemption {
        match preemption_outcome(candidate, ctx.target_severity, ctx.config) {
            PreemptionOutcome::Disqualified => {
                return ScoredCandidate {
                    candidate: candidate.clone(),
                    score: DISQUALIFIED,
                    requires_preemption: true,
                }
            }
            PreemptionOutcome::Allowed(term) => term,
        }
    } else {
        0.0
    };

    let reassignment_term = if requires_preemption {
        ctx.config.weight_reassignment_cost()
    } else {
        0.0
    };

    let score = ctx.config.weight_travel_time() * f64::from(candidate.travel_seconds)
        + ctx.config.weight_coverage_penalty() * coverage_penalty(candidate, ctx)
        + ctx.config.weight_capability_match() * capability_match(candidate, ctx.recommended_unit_types)
        + ctx.config.weight_en_route_progress() * en_route_bonus(candidate)
        + preemption_term
        + reassignment_term;

    ScoredCandidate {
        candidate: candidate.clone(),
        score,
        requires_preemption,
    }
}

enum PreemptionOutcome {
    Allowed(f64),
    Disqualified,
}

/// Only meaningful when the candidate is currently assigned elsewhere.
/// Preemption is attractive (and legal) only when the new target is severe
/// enough and strictly outranks the candidate's current assignment
/// (spec.md §4.3).
fn preemption_outcome(
    candidate: &Candidate,
    target_severity: u32,
    config: &DispatchConfig,
) -> PreemptionOutcome {
    let current_severity = match &candidate.status {
        CandidateStatus::Assigned { severity, .. } => *severity,
        CandidateStatus::Idle => return PreemptionOutcome::Allowed(0.0),
    };

    let threshold = config.preemption_severity_threshold();
    if target_severity >= threshold && current_severity < target_severity {
        PreemptionOutcome::Allowed(config.weight_preemption_delta())
    } else {
        PreemptionOutcome::Disqualified
    }
}

/// Count by which removing this unit would push its home base below the
/// reserve threshold, clamped at zero. Zero when the unit isn't currently
/// sitting idle at its own base, or when the base is unknown to the cache.
fn coverage_penalty(candidate: &Candidate, ctx: &ScoringContext) -> f64 {
    if !candidate.is_at_home_base() {
        return 0.0;
    }
    if !ctx.known_base_codes.contains(&candidate.home_base_code) {
        return 0.0;
    }

    let idle_count = ctx
        .idle_counts_by_base
        .get(&candidate.home_base_code)
        .copied()
        .unwrap_or(0);
    let remaining_after_dispatch = idle_count.saturating_sub(1);
    let min_reserve = ctx.config.min_reserve_per_base();

    min_reserve.saturating_sub(remaining_after_dispatch) as f64
}

fn capability_match(candidate: &Candidate, recommended_unit_types: &[String]) -> f64 {
    if recommended_unit_types
        .iter()
        .any(|t| t == &candidate.unit_type_code)
    {
        1.0
    } else {
        0.0
    }
}

fn en_route_bonus(candidate: &Candidate) -> f64 {
    if candidate.en_route_to_target {
        -1.0
    } else {
        0.0
    }
}
