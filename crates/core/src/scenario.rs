//! Scenario configuration records.
//!
//! External collaborators (editors, wizards, host loops) author these plain
//! structured records; the core consumes them read-only. Validation is
//! fail-fast: a scenario is checked in full before any simulation state is
//! constructed, so a bad parameter can never surface mid-episode.

use crate::agents::AgentClass;
use crate::targets::TargetCategory;
use serde::{Deserialize, Serialize};

/// An initial ignition area seeding multiple fire spots.
///
/// Immutable after scenario setup. Each area carries its own geo-physical
/// parameters, so two areas in the same scenario may burn under different
/// wind regimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotArea {
    /// Bounding box, inclusive of `min`, exclusive of `max`.
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    /// Number of ignition points sampled uniformly inside the box.
    pub num_ignition_points: u32,
    /// Maximum fuel coefficient for the area's spread-rate raster.
    /// Higher values give a more circular fire shape.
    pub fuel_coeff: f32,
    /// Average mid-flame wind speed. Higher values stretch the fire.
    pub wind_speed: f32,
    /// Wind azimuth in degrees.
    pub wind_direction_deg: f32,
    /// Ticks before this area ignites.
    #[serde(default)]
    pub ignition_delay: u32,
}

impl HotspotArea {
    /// Square area of the given half-extent around a center point.
    #[must_use]
    pub fn around(
        center: (i32, i32),
        half_extent: i32,
        num_ignition_points: u32,
        fuel_coeff: f32,
        wind_speed: f32,
        wind_direction_deg: f32,
    ) -> Self {
        Self {
            x_min: center.0 - half_extent,
            x_max: center.0 + half_extent,
            y_min: center.1 - half_extent,
            y_max: center.1 + half_extent,
            num_ignition_points,
            fuel_coeff,
            wind_speed,
            wind_direction_deg,
            ignition_delay: 0,
        }
    }

    /// Wind azimuth in radians.
    #[must_use]
    pub fn wind_direction_rad(&self) -> f32 {
        self.wind_direction_deg.to_radians()
    }
}

/// Physical constants of the fire model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireModelParams {
    /// Simulation time step per tick.
    pub time_step: f32,
    /// Maximum effective thermal radiation range.
    pub radiation_radius: f32,
    /// Intensity below which a fire spot burns out.
    pub weak_fire_threshold: f32,
    /// Vertical extension of the flame, ignoring occasional flashes that
    /// rise above the general level of fire.
    pub flame_height: f32,
    /// Tilt between the flame heading and the vertical axis through the
    /// spot, in radians.
    pub flame_angle: f32,
    /// Fuel exhaustion rate; greater means faster exhaustion.
    pub decay_rate: f32,
}

impl Default for FireModelParams {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            radiation_radius: 10.0,
            weak_fire_threshold: 5.0,
            flame_height: 3.0,
            flame_angle: std::f32::consts::FRAC_PI_3,
            decay_rate: 0.01,
        }
    }
}

/// Per-agent scenario record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub class: AgentClass,
    /// Base position the agent starts at and returns to.
    pub home: [f32; 2],
    /// Planar speed limit per tick.
    pub speed: f32,
    /// Total battery capacity.
    pub battery_capacity: f32,
    /// Battery cost per unit of distance traveled.
    pub battery_distance_cost: f32,
    /// Battery cost per wait tick.
    pub battery_wait_cost: f32,
    /// Extinguisher charges; ignored for the perception class.
    #[serde(default)]
    pub tank_capacity: u32,
}

/// A protected facility on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    pub category: TargetCategory,
    pub center: [f32; 2],
    pub width: f32,
    pub height: f32,
}

/// Per-category penalty weights charged per burning cell inside a target
/// region when scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityPenalties {
    pub house: f32,
    pub hospital: f32,
    pub power_station: f32,
    pub base: f32,
}

impl Default for FacilityPenalties {
    fn default() -> Self {
        Self {
            house: 2.0,
            hospital: 5.0,
            power_station: 4.0,
            base: 3.0,
        }
    }
}

impl FacilityPenalties {
    #[must_use]
    pub fn for_category(&self, category: TargetCategory) -> f32 {
        match category {
            TargetCategory::House => self.house,
            TargetCategory::Hospital => self.hospital,
            TargetCategory::PowerStation => self.power_station,
            TargetCategory::Base => self.base,
        }
    }
}

/// Complete scenario description consumed by the simulation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Side length of the square world.
    pub world_size: u32,
    /// Episode length in ticks.
    pub duration: u32,
    pub hotspots: Vec<HotspotArea>,
    pub targets: Vec<TargetSpec>,
    pub agents: Vec<AgentSpec>,
    /// Chebyshev communication range between agents.
    pub comm_hop: f32,
    #[serde(default)]
    pub fire: FireModelParams,
    /// Exponent of the time-discounted penalty term.
    pub temporal_penalty_exponent: f32,
    /// Weight of each active fire cell in the penalty term.
    pub fire_propagation_weight: f32,
    /// Fraction of in-view cells a suppression-class agent extinguishes
    /// per action.
    pub action_pruning_confidence: f32,
    /// Same, for the hybrid class.
    pub hybrid_pruning_confidence: f32,
    #[serde(default)]
    pub facility_penalties: FacilityPenalties,
    /// Action-completion ratio at which the episode is won.
    pub completion_threshold: f32,
}

impl ScenarioConfig {
    /// Check every parameter before simulation start.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint; nothing is constructed on
    /// failure.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.world_size < 2 {
            return Err(ScenarioError::InvalidParameter {
                name: "world_size",
                detail: format!("must be at least 2, got {}", self.world_size),
            });
        }
        if self.duration == 0 {
            return Err(ScenarioError::InvalidParameter {
                name: "duration",
                detail: "must be positive".into(),
            });
        }
        if self.hotspots.is_empty() {
            return Err(ScenarioError::NoHotspots);
        }
        if self.agents.is_empty() {
            return Err(ScenarioError::NoAgents);
        }
        let limit = self.world_size as i32;
        for (i, h) in self.hotspots.iter().enumerate() {
            if h.x_min >= h.x_max || h.y_min >= h.y_max {
                return Err(ScenarioError::InvalidHotspot {
                    index: i,
                    detail: "bounding box is empty".into(),
                });
            }
            if h.x_min < 0 || h.y_min < 0 || h.x_max > limit || h.y_max > limit {
                return Err(ScenarioError::InvalidHotspot {
                    index: i,
                    detail: format!("bounding box exceeds world of size {}", self.world_size),
                });
            }
            if h.num_ignition_points == 0 {
                return Err(ScenarioError::InvalidHotspot {
                    index: i,
                    detail: "needs at least one ignition point".into(),
                });
            }
            if h.fuel_coeff <= 0.0 || !h.fuel_coeff.is_finite() {
                return Err(ScenarioError::InvalidHotspot {
                    index: i,
                    detail: format!("fuel coefficient must be positive, got {}", h.fuel_coeff),
                });
            }
        }
        for (i, a) in self.agents.iter().enumerate() {
            if a.speed <= 0.0 || !a.speed.is_finite() {
                return Err(ScenarioError::InvalidAgent {
                    index: i,
                    detail: format!("speed must be positive, got {}", a.speed),
                });
            }
            if a.battery_capacity <= 0.0 {
                return Err(ScenarioError::InvalidAgent {
                    index: i,
                    detail: format!(
                        "battery capacity must be positive, got {}",
                        a.battery_capacity
                    ),
                });
            }
            if a.battery_distance_cost < 0.0 || a.battery_wait_cost < 0.0 {
                return Err(ScenarioError::InvalidAgent {
                    index: i,
                    detail: "battery cost coefficients cannot be negative".into(),
                });
            }
            if a.class.capabilities().can_suppress && a.tank_capacity == 0 {
                return Err(ScenarioError::InvalidAgent {
                    index: i,
                    detail: "suppression-capable agent needs a nonzero tank".into(),
                });
            }
        }
        for (i, t) in self.targets.iter().enumerate() {
            if t.width <= 0.0 || t.height <= 0.0 {
                return Err(ScenarioError::InvalidTarget {
                    index: i,
                    detail: "target box must have positive extent".into(),
                });
            }
        }
        for (name, value) in [
            ("comm_hop", self.comm_hop),
            ("action_pruning_confidence", self.action_pruning_confidence),
            ("hybrid_pruning_confidence", self.hybrid_pruning_confidence),
            ("completion_threshold", self.completion_threshold),
            ("radiation_radius", self.fire.radiation_radius),
            ("flame_height", self.fire.flame_height),
            ("time_step", self.fire.time_step),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ScenarioError::InvalidParameter {
                    name,
                    detail: format!("must be positive and finite, got {value}"),
                });
            }
        }
        if self.action_pruning_confidence > 1.0 || self.hybrid_pruning_confidence > 1.0 {
            return Err(ScenarioError::InvalidParameter {
                name: "pruning confidence",
                detail: "confidence levels are fractions in (0, 1]".into(),
            });
        }
        Ok(())
    }
}

/// Configuration rejected before simulation start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// The scenario defines no ignition areas.
    NoHotspots,
    /// The scenario defines no agents.
    NoAgents,
    /// A hotspot area is malformed.
    InvalidHotspot { index: usize, detail: String },
    /// An agent record is malformed.
    InvalidAgent { index: usize, detail: String },
    /// A target region is malformed.
    InvalidTarget { index: usize, detail: String },
    /// A scalar parameter is out of range.
    InvalidParameter {
        name: &'static str,
        detail: String,
    },
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::NoHotspots => write!(f, "scenario has no hotspot areas"),
            ScenarioError::NoAgents => write!(f, "scenario has no agents"),
            ScenarioError::InvalidHotspot { index, detail } => {
                write!(f, "hotspot #{index}: {detail}")
            }
            ScenarioError::InvalidAgent { index, detail } => {
                write!(f, "agent #{index}: {detail}")
            }
            ScenarioError::InvalidTarget { index, detail } => {
                write!(f, "target #{index}: {detail}")
            }
            ScenarioError::InvalidParameter { name, detail } => {
                write!(f, "parameter '{name}': {detail}")
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentClass;

    fn minimal_scenario() -> ScenarioConfig {
        ScenarioConfig {
            world_size: 100,
            duration: 200,
            hotspots: vec![HotspotArea::around((50, 50), 5, 5, 10.0, 5.0, 45.0)],
            targets: vec![],
            agents: vec![AgentSpec {
                class: AgentClass::Perception,
                home: [90.0, 10.0],
                speed: 5.0,
                battery_capacity: 500.0,
                battery_distance_cost: 0.1,
                battery_wait_cost: 0.05,
                tank_capacity: 0,
            }],
            comm_hop: 30.0,
            fire: FireModelParams::default(),
            temporal_penalty_exponent: 1.25,
            fire_propagation_weight: 0.1,
            action_pruning_confidence: 0.9,
            hybrid_pruning_confidence: 0.8,
            facility_penalties: FacilityPenalties::default(),
            completion_threshold: 0.95,
        }
    }

    #[test]
    fn test_minimal_scenario_validates() {
        assert!(minimal_scenario().validate().is_ok());
    }

    #[test]
    fn test_empty_hotspot_box_rejected() {
        let mut cfg = minimal_scenario();
        cfg.hotspots[0].x_max = cfg.hotspots[0].x_min;
        assert!(matches!(
            cfg.validate(),
            Err(ScenarioError::InvalidHotspot { index: 0, .. })
        ));
    }

    #[test]
    fn test_hotspot_outside_world_rejected() {
        let mut cfg = minimal_scenario();
        cfg.hotspots[0].x_max = 200;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_suppression_agent_without_tank_rejected() {
        let mut cfg = minimal_scenario();
        cfg.agents.push(AgentSpec {
            class: AgentClass::Suppression,
            home: [90.0, 10.0],
            speed: 5.0,
            battery_capacity: 500.0,
            battery_distance_cost: 0.1,
            battery_wait_cost: 0.05,
            tank_capacity: 0,
        });
        assert!(matches!(
            cfg.validate(),
            Err(ScenarioError::InvalidAgent { index: 1, .. })
        ));
    }

    #[test]
    fn test_confidence_above_one_rejected() {
        let mut cfg = minimal_scenario();
        cfg.action_pruning_confidence = 1.2;
        assert!(cfg.validate().is_err());
    }
}
