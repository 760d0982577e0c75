//! Immutable per-tick snapshots for external collaborators.
//!
//! Rendering and persistence never touch live simulation state; they read
//! these serializable copies after the tick completes.

use crate::agents::{Agent, AgentClass, AgentMode};
use crate::core_types::CellCoord;
use crate::fire::field::FireSpot;
use crate::scoring::ScoreReport;
use crate::targets::TargetRegion;
use serde::{Deserialize, Serialize};

/// Read-only view of one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: usize,
    pub class: AgentClass,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub mode: AgentMode,
    pub battery_remaining: f32,
    pub tank: u32,
    pub active: bool,
}

impl AgentSnapshot {
    #[must_use]
    pub fn of(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            class: agent.class,
            position: [agent.position.x, agent.position.y, agent.position.z],
            velocity: [agent.velocity.x, agent.velocity.y, agent.velocity.z],
            mode: agent.mode,
            battery_remaining: agent.battery.remaining(),
            tank: agent.tank,
            active: agent.active,
        }
    }
}

/// Complete state of one tick, frozen for consumers.
///
/// Cell lists are sorted so two snapshots of identical states are
/// byte-identical when serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u32,
    /// Continuous fire spots still radiating.
    pub spots: Vec<FireSpot>,
    pub on_fire: Vec<CellCoord>,
    pub sensed: Vec<CellCoord>,
    pub pruned: Vec<CellCoord>,
    /// Spots that burnt out on their own, cumulative.
    pub burnt_out: Vec<FireSpot>,
    pub agents: Vec<AgentSnapshot>,
    pub targets: Vec<TargetRegion>,
    pub score: ScoreReport,
}

/// Sort a cell set into a stable, renderable order.
pub(crate) fn sorted_cells<'a>(cells: impl Iterator<Item = &'a CellCoord>) -> Vec<CellCoord> {
    let mut list: Vec<CellCoord> = cells.copied().collect();
    list.sort_unstable_by_key(|c| (c.x, c.y));
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_cells_are_stable() {
        let cells = [
            CellCoord::new(5, 1),
            CellCoord::new(1, 9),
            CellCoord::new(1, 2),
        ];
        let sorted = sorted_cells(cells.iter());
        assert_eq!(
            sorted,
            vec![
                CellCoord::new(1, 2),
                CellCoord::new(1, 9),
                CellCoord::new(5, 1)
            ]
        );
    }
}
