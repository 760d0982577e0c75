//! Agent classes and their capability tables.
//!
//! The class is a tagged variant carrying a static capability table; all
//! class-dependent behavior (sensing, suppression, camera geometry,
//! altitude envelope) is a lookup, not a branch on an integer code.

use serde::{Deserialize, Serialize};

/// What a class of agent is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassCapabilities {
    /// May detect fire cells and feed the sensed overlay.
    pub can_sense: bool,
    /// May extinguish sensed fire cells.
    pub can_suppress: bool,
    /// Camera half-angle; the FOV half-extent is `tan(half_angle) * altitude`.
    pub camera_half_angle: f32,
    /// Allowed flight envelope as `(min, max)` altitude. Classes that
    /// cannot change altitude have `min == max`.
    pub altitude_bounds: (f32, f32),
}

/// Robot class; a capability-tagged variant, not an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentClass {
    /// Pure perception: senses fire, cannot extinguish.
    Perception,
    /// Pure suppression: extinguishes sensed fire, flies at fixed altitude.
    Suppression,
    /// Both sensing and suppression.
    Hybrid,
}

impl AgentClass {
    /// The static capability table for this class.
    #[must_use]
    pub const fn capabilities(self) -> ClassCapabilities {
        match self {
            AgentClass::Perception => ClassCapabilities {
                can_sense: true,
                can_suppress: false,
                camera_half_angle: std::f32::consts::FRAC_PI_4,
                altitude_bounds: (5.0, 15.0),
            },
            AgentClass::Suppression => ClassCapabilities {
                can_sense: false,
                can_suppress: true,
                camera_half_angle: std::f32::consts::FRAC_PI_4,
                altitude_bounds: (10.0, 10.0),
            },
            AgentClass::Hybrid => ClassCapabilities {
                can_sense: true,
                can_suppress: true,
                camera_half_angle: std::f32::consts::FRAC_PI_4,
                altitude_bounds: (5.0, 15.0),
            },
        }
    }
}
