//! Cell-level fire bookkeeping.
//!
//! Three disjoint-by-construction coordinate sets:
//!
//! - burning: cells currently (or historically, if never extinguished) on
//!   fire inside the world,
//! - sensed: burning cells a perception-capable agent has detected,
//! - extinguished: cells an agent put out.
//!
//! A cell is in at most one of burning/extinguished at any time, and the
//! sensed overlay is always a subset of burning. Out-of-world coordinates
//! never enter any set; outside the world is not on fire.

use crate::core_types::CellCoord;
use crate::fire::field::FireSpot;
use crate::targets::TargetRegion;
use rustc_hash::FxHashSet;

/// The global burning/sensed/extinguished coordinate sets.
#[derive(Debug, Clone, Default)]
pub struct FireTracker {
    world_size: u32,
    on_fire: FxHashSet<CellCoord>,
    sensed: FxHashSet<CellCoord>,
    pruned: FxHashSet<CellCoord>,
}

impl FireTracker {
    #[must_use]
    pub fn new(world_size: u32) -> Self {
        Self {
            world_size,
            ..Self::default()
        }
    }

    /// Merge a freshly propagated front into the burning set.
    ///
    /// New burning cells bump the burning count of any target region whose
    /// box contains them. Cells outside the world, already burning, or
    /// already extinguished are skipped.
    pub fn merge_front(&mut self, front: &[FireSpot], targets: &mut [TargetRegion]) {
        for spot in front {
            let cell = spot.cell();
            if !cell.in_world(self.world_size) {
                continue;
            }
            if self.pruned.contains(&cell) || !self.on_fire.insert(cell) {
                continue;
            }
            for target in &mut *targets {
                target.record_ignition(cell);
            }
        }
    }

    /// Add detected cells to the sensed overlay.
    ///
    /// Only cells currently burning can be sensed; extinguished or
    /// out-of-world detections are discarded. Returns how many cells were
    /// newly sensed, the detecting agent's contribution.
    pub fn record_sensed(&mut self, cells: &[CellCoord]) -> u32 {
        let mut newly_sensed = 0;
        for cell in cells {
            if self.on_fire.contains(cell) && self.sensed.insert(*cell) {
                newly_sensed += 1;
            }
        }
        newly_sensed
    }

    /// Extinguish one burning cell.
    ///
    /// Moves the cell from burning (and the sensed overlay) into the
    /// extinguished set and decrements the burning count of any containing
    /// target region. Returns false if the cell was not burning.
    pub fn suppress(&mut self, cell: CellCoord, targets: &mut [TargetRegion]) -> bool {
        if !self.on_fire.remove(&cell) {
            return false;
        }
        self.sensed.remove(&cell);
        self.pruned.insert(cell);
        for target in targets.iter_mut() {
            target.record_suppression(cell);
        }
        true
    }

    #[must_use]
    pub fn is_on_fire(&self, cell: CellCoord) -> bool {
        self.on_fire.contains(&cell)
    }

    #[must_use]
    pub fn is_sensed(&self, cell: CellCoord) -> bool {
        self.sensed.contains(&cell)
    }

    #[must_use]
    pub fn is_pruned(&self, cell: CellCoord) -> bool {
        self.pruned.contains(&cell)
    }

    #[must_use]
    pub fn on_fire(&self) -> &FxHashSet<CellCoord> {
        &self.on_fire
    }

    #[must_use]
    pub fn sensed(&self) -> &FxHashSet<CellCoord> {
        &self.sensed
    }

    #[must_use]
    pub fn pruned(&self) -> &FxHashSet<CellCoord> {
        &self.pruned
    }

    #[must_use]
    pub fn on_fire_count(&self) -> usize {
        self.on_fire.len()
    }

    #[must_use]
    pub fn sensed_count(&self) -> usize {
        self.sensed.len()
    }

    #[must_use]
    pub fn pruned_count(&self) -> usize {
        self.pruned.len()
    }

    /// Check the set invariants; cheap enough to call every tick in debug
    /// builds.
    pub fn debug_validate(&self) {
        debug_assert!(
            self.on_fire.is_disjoint(&self.pruned),
            "a cell is both burning and extinguished"
        );
        debug_assert!(
            self.sensed.is_subset(&self.on_fire),
            "sensed overlay leaked outside the burning set"
        );
    }
}
