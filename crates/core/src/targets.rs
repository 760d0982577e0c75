//! Protected facilities tracked against the spreading fire.

use crate::core_types::CellCoord;
use crate::scenario::TargetSpec;
use serde::{Deserialize, Serialize};

/// Facility category; determines the penalty weight a burning cell inside
/// the region contributes to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCategory {
    House,
    Hospital,
    PowerStation,
    Base,
}

/// A protected region on the map.
///
/// Created once at scenario setup and never destroyed. The burning-cell
/// count goes up when a new fire cell appears inside the box and down when
/// an agent extinguishes one; `ever_on_fire` latches on the first hit and
/// never clears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRegion {
    pub category: TargetCategory,
    center: [f32; 2],
    half_width: f32,
    half_height: f32,
    burning_cells: u32,
    ever_on_fire: bool,
}

impl TargetRegion {
    #[must_use]
    pub fn from_spec(spec: &TargetSpec) -> Self {
        Self {
            category: spec.category,
            center: spec.center,
            half_width: spec.width / 2.0,
            half_height: spec.height / 2.0,
            burning_cells: 0,
            ever_on_fire: false,
        }
    }

    /// Strict interior test on the tracking cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let x = cell.x as f32;
        let y = cell.y as f32;
        x > self.center[0] - self.half_width
            && x < self.center[0] + self.half_width
            && y > self.center[1] - self.half_height
            && y < self.center[1] + self.half_height
    }

    /// Record a fire cell entering the region.
    pub fn record_ignition(&mut self, cell: CellCoord) {
        if self.contains(cell) {
            self.burning_cells += 1;
            self.ever_on_fire = true;
        }
    }

    /// Record a fire cell inside the region being extinguished.
    pub fn record_suppression(&mut self, cell: CellCoord) {
        if self.contains(cell) {
            self.burning_cells = self.burning_cells.saturating_sub(1);
        }
    }

    /// Live count of burning cells inside the box.
    #[must_use]
    pub fn burning_cells(&self) -> u32 {
        self.burning_cells
    }

    /// Whether the region has ever caught fire. Sticky once set.
    #[must_use]
    pub fn ever_on_fire(&self) -> bool {
        self.ever_on_fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house_at(center: [f32; 2]) -> TargetRegion {
        TargetRegion::from_spec(&TargetSpec {
            category: TargetCategory::House,
            center,
            width: 10.0,
            height: 10.0,
        })
    }

    #[test]
    fn test_interior_is_strict() {
        let region = house_at([50.0, 50.0]);
        assert!(region.contains(CellCoord::new(50, 50)));
        assert!(region.contains(CellCoord::new(46, 54)));
        // Cells exactly on the boundary are outside.
        assert!(!region.contains(CellCoord::new(45, 50)));
        assert!(!region.contains(CellCoord::new(50, 55)));
    }

    #[test]
    fn test_ever_on_fire_is_sticky() {
        let mut region = house_at([50.0, 50.0]);
        assert!(!region.ever_on_fire());

        region.record_ignition(CellCoord::new(50, 50));
        assert_eq!(region.burning_cells(), 1);
        assert!(region.ever_on_fire());

        region.record_suppression(CellCoord::new(50, 50));
        assert_eq!(region.burning_cells(), 0);
        assert!(region.ever_on_fire(), "flag must not clear on suppression");
    }

    #[test]
    fn test_cells_outside_do_not_count() {
        let mut region = house_at([50.0, 50.0]);
        region.record_ignition(CellCoord::new(10, 10));
        assert_eq!(region.burning_cells(), 0);
        assert!(!region.ever_on_fire());
    }

    #[test]
    fn test_suppression_never_underflows() {
        let mut region = house_at([50.0, 50.0]);
        region.record_suppression(CellCoord::new(50, 50));
        assert_eq!(region.burning_cells(), 0);
    }
}
