//! Stochastic fire suppression.

use crate::agents::Agent;
use crate::core_types::{CellCoord, SimRng};
use crate::fire::FireTracker;
use crate::sensing::fov::FovRect;
use crate::targets::TargetRegion;
use tracing::debug;

/// Result of one suppression attempt.
#[derive(Debug, Clone, Default)]
pub struct SuppressionOutcome {
    /// Cells actually extinguished this action.
    pub extinguished: Vec<CellCoord>,
    /// Whether the footprint overlapped previously sensed cells. When
    /// false the whole attempt was rejected and nothing was mutated.
    pub sensed_gate: bool,
}

/// Extinguish burning cells inside the agent's field of view.
///
/// Burning cells in the footprint are sampled with the agent's confidence,
/// exactly like detection. The action only goes through if at least one
/// in-view candidate is already on the sensed overlay: suppression without
/// prior detection is rejected, a trust invariant between the perception
/// and suppression classes. A confirmed action costs one tank charge.
pub fn suppress(
    tracker: &mut FireTracker,
    targets: &mut [TargetRegion],
    agent: &mut Agent,
    confidence: f32,
    rng: &mut SimRng,
) -> SuppressionOutcome {
    let fov = FovRect::for_agent(agent);
    let mut candidates: Vec<CellCoord> = tracker
        .on_fire()
        .iter()
        .copied()
        .filter(|cell| fov.contains_cell(*cell))
        .collect();
    if candidates.is_empty() {
        return SuppressionOutcome::default();
    }
    // Hash-set iteration order is an implementation detail; fix it before
    // sampling so a seed pins the whole episode.
    candidates.sort_unstable_by_key(|cell| (cell.x, cell.y));

    let keep = (confidence * candidates.len() as f32).round() as usize;
    let picked = rng.sample_indices(candidates.len(), keep);

    let sensed_gate = candidates.iter().any(|cell| tracker.is_sensed(*cell));
    if !sensed_gate {
        debug!(
            "agent {} suppression rejected: no sensed cell in view",
            agent.id
        );
        return SuppressionOutcome::default();
    }

    let mut extinguished = Vec::with_capacity(picked.len());
    for index in picked {
        let cell = candidates[index];
        if tracker.suppress(cell, targets) {
            extinguished.push(cell);
        }
    }

    if !extinguished.is_empty() {
        agent.consume_tank_charge();
    }

    SuppressionOutcome {
        extinguished,
        sensed_gate,
    }
}
