//! Stochastic fire detection.

use crate::agents::Agent;
use crate::core_types::{CellCoord, SimRng};
use crate::fire::{FireField, FireSpot};
use crate::sensing::fov::FovRect;
use rustc_hash::FxHashSet;

/// Detect burning cells inside the agent's field of view.
///
/// Gathers every active fire spot in the footprint, stochastically keeps
/// `round(confidence * candidates)` of them without replacement to model an
/// imperfect sensor, and deduplicates the survivors by tracking cell. The
/// result is what the agent reports; merging into the global sensed overlay
/// is the caller's bookkeeping step.
pub fn sense(
    field: &FireField,
    agent: &Agent,
    confidence: f32,
    rng: &mut SimRng,
) -> Vec<CellCoord> {
    let fov = FovRect::for_agent(agent);
    let candidates: Vec<CellCoord> = field
        .active_spots()
        .filter(|spot| fov.contains(spot.x, spot.y))
        .map(FireSpot::cell)
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let keep = (confidence * candidates.len() as f32).round() as usize;
    let picked = rng.sample_indices(candidates.len(), keep);

    let mut seen = FxHashSet::default();
    let mut detected = Vec::with_capacity(picked.len());
    for index in picked {
        let cell = candidates[index];
        if seen.insert(cell) {
            detected.push(cell);
        }
    }
    detected
}
