//! Episode scoring.
//!
//! Completion percentages over the tracking sets, a safe-facility count
//! over the target regions, and a time-discounted negative score that
//! charges active fire harder the longer it burns, normalized against an
//! expected worst case so hosts can display it as a percentage.

use crate::scenario::FacilityPenalties;
use crate::targets::TargetRegion;
use serde::{Deserialize, Serialize};

/// Aggregated score metrics for one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Extinguished fraction of everything that burned, percent.
    pub overall_completion: f32,
    /// Found-or-extinguished fraction of everything that burned, percent.
    pub perception_completion: f32,
    /// Extinguished fraction of everything found, percent.
    pub action_completion: f32,
    /// Target regions that never caught fire.
    pub safe_facilities: u32,
    /// Total target regions.
    pub facility_count: u32,
    /// Safe fraction of all facilities, percent.
    pub facility_completion: f32,
    /// Accumulated penalty; grows with burning cells, facility damage and
    /// elapsed time.
    pub negative_score: f32,
    /// Negative score as a percentage of the expected worst case.
    pub negative_percent: f32,
}

/// Weights of the time-discounted penalty term.
#[derive(Debug, Clone)]
pub struct ScoringParams<'a> {
    pub facility_penalties: &'a FacilityPenalties,
    /// Weight of each active cell in the penalty term.
    pub fire_weight: f32,
    /// Exponent applied to elapsed time.
    pub temporal_exponent: f32,
    /// Per-hotspot ignition delays; the worst case only charges an area
    /// once it could actually be burning.
    pub ignition_delays: &'a [u32],
}

/// Compute the score metrics from the current tracking state.
pub fn compute_score(
    on_fire: usize,
    sensed: usize,
    pruned: usize,
    targets: &[TargetRegion],
    params: &ScoringParams<'_>,
    time: f32,
) -> ScoreReport {
    let burned_total = (on_fire + pruned) as f32;
    let (overall, perception) = if burned_total > 0.0 {
        (
            pruned as f32 / burned_total * 100.0,
            (sensed + pruned) as f32 / burned_total * 100.0,
        )
    } else {
        (0.0, 0.0)
    };
    let found_total = (sensed + pruned) as f32;
    let action = if found_total > 0.0 {
        pruned as f32 / found_total * 100.0
    } else {
        0.0
    };

    let facility_count = targets.len() as u32;
    let safe_facilities = targets.iter().filter(|t| !t.ever_on_fire()).count() as u32;
    let facility_completion = if facility_count > 0 {
        safe_facilities as f32 / facility_count as f32 * 100.0
    } else {
        100.0
    };

    let mut negative_score = 0.0;
    for target in targets {
        negative_score += target.burning_cells() as f32
            * params.facility_penalties.for_category(target.category);
    }
    negative_score += on_fire as f32 * params.fire_weight * time.powf(params.temporal_exponent);

    let mut expected_worst = 0.0;
    for &delay in params.ignition_delays {
        let burn_time = (time - delay as f32).max(0.0);
        expected_worst +=
            burned_total * params.fire_weight * burn_time.powf(params.temporal_exponent);
    }
    let negative_percent = if expected_worst > 0.0 {
        negative_score / expected_worst * 100.0
    } else {
        0.0
    };

    ScoreReport {
        overall_completion: overall,
        perception_completion: perception,
        action_completion: action,
        safe_facilities,
        facility_count,
        facility_completion,
        negative_score,
        negative_percent,
    }
}
