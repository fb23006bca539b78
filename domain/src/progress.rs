//! Progress estimation over a phase-list snapshot.
//!
//! Both functions are pure and deterministic: same phase list in, same
//! number out. This is the property-testable core of the whole client.
//!
//! A running phase is always credited at exactly 50% of its weight. True
//! sub-phase progress is not observable from the wire protocol, so a
//! fixed midpoint beats pretending to know better.

use crate::conference::phase::{Phase, PhaseStatus};

/// Weight in seconds for a phase with no a-priori estimate, used only
/// when no phase in the slice carries one.
pub const DEFAULT_PHASE_WEIGHT: f64 = 30.0;

/// Weight of a phase: its own estimate, else the median of the estimates
/// that are present, else [`DEFAULT_PHASE_WEIGHT`]. Un-estimated phases
/// neither dominate nor vanish from the computation.
fn fallback_weight(phases: &[Phase]) -> f64 {
    let mut known: Vec<f64> = phases
        .iter()
        .filter_map(|p| p.estimated_duration)
        .filter(|d| *d > 0.0)
        .collect();
    if known.is_empty() {
        return DEFAULT_PHASE_WEIGHT;
    }
    known.sort_by(|a, b| a.total_cmp(b));
    let mid = known.len() / 2;
    if known.len() % 2 == 1 {
        known[mid]
    } else {
        (known[mid - 1] + known[mid]) / 2.0
    }
}

fn weight_of(phase: &Phase, fallback: f64) -> f64 {
    match phase.estimated_duration {
        Some(d) if d > 0.0 => d,
        _ => fallback,
    }
}

/// Weighted overall completion percentage, 0-100.
///
/// Complete phases count their full weight, running phases exactly half,
/// everything else zero. Returns 0 for an empty phase list.
pub fn overall_progress(phases: &[Phase]) -> u8 {
    if phases.is_empty() {
        return 0;
    }
    let fallback = fallback_weight(phases);
    let mut total = 0.0;
    let mut done = 0.0;
    for phase in phases {
        let weight = weight_of(phase, fallback);
        total += weight;
        done += match phase.status {
            PhaseStatus::Complete => weight,
            PhaseStatus::Running => weight / 2.0,
            PhaseStatus::Pending | PhaseStatus::Error => 0.0,
        };
    }
    if total <= 0.0 {
        return 0;
    }
    (100.0 * done / total).round() as u8
}

/// Estimated seconds remaining: full weight for each pending phase, half
/// for a running one, nothing for phases that already ended.
pub fn estimate_time_remaining(phases: &[Phase]) -> u64 {
    let fallback = fallback_weight(phases);
    let remaining: f64 = phases
        .iter()
        .map(|phase| match phase.status {
            PhaseStatus::Pending => weight_of(phase, fallback),
            PhaseStatus::Running => weight_of(phase, fallback) / 2.0,
            PhaseStatus::Complete | PhaseStatus::Error => 0.0,
        })
        .sum();
    remaining.round() as u64
}
