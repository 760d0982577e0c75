//! Camera footprint geometry.

use crate::agents::Agent;
use crate::core_types::CellCoord;

/// The rectangular ground footprint an agent can act on.
///
/// Centered on the agent's planar position with half-extents
/// `tan(camera_half_angle) * altitude`: flying higher widens the view at
/// the cost of sensing confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovRect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl FovRect {
    #[must_use]
    pub fn for_agent(agent: &Agent) -> Self {
        let half = agent.capabilities().camera_half_angle.tan() * agent.position.z;
        Self {
            min_x: agent.position.x - half,
            max_x: agent.position.x + half,
            min_y: agent.position.y - half,
            max_y: agent.position.y + half,
        }
    }

    /// Inclusive containment test for a continuous position.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Containment test for a tracking cell.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.contains(cell.x as f32, cell.y as f32)
    }

    /// Footprint area.
    #[must_use]
    pub fn area(&self) -> f32 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }
}
