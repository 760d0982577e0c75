//! Per-agent state: pose, resources, and the goal queue.

use crate::agents::class::{AgentClass, ClassCapabilities};
use crate::core_types::Vec3;
use crate::scenario::AgentSpec;
use serde::{Deserialize, Serialize};

/// Operating mode of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentMode {
    /// Parked, or waiting at its last goal.
    Idle,
    /// En route to the current goal.
    Moving,
    /// Resources ran out; heading home. Not an error state.
    ForcedReturn,
}

/// Battery bookkeeping.
///
/// Consumption is `distance_cost * distance + wait_cost * wait_ticks`;
/// the remaining charge is clamped at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battery {
    capacity: f32,
    distance_cost: f32,
    wait_cost: f32,
    distance_traveled: f32,
    wait_ticks: f32,
}

impl Battery {
    #[must_use]
    pub fn new(capacity: f32, distance_cost: f32, wait_cost: f32) -> Self {
        Self {
            capacity,
            distance_cost,
            wait_cost,
            distance_traveled: 0.0,
            wait_ticks: 0.0,
        }
    }

    pub fn record_travel(&mut self, distance: f32) {
        self.distance_traveled += distance;
    }

    pub fn record_wait(&mut self) {
        self.wait_ticks += 1.0;
    }

    #[must_use]
    pub fn consumed(&self) -> f32 {
        self.distance_cost * self.distance_traveled + self.wait_cost * self.wait_ticks
    }

    /// Remaining charge, clamped at zero.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.capacity - self.consumed()).max(0.0)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.capacity - self.consumed() <= 0.0
    }
}

/// Ordered goals with a cursor, optionally looping for patrols.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalQueue {
    goals: Vec<Vec3>,
    cursor: usize,
    patrol: bool,
}

impl GoalQueue {
    /// The goal the agent is currently heading to, if any.
    #[must_use]
    pub fn current(&self) -> Option<Vec3> {
        self.goals.get(self.cursor).copied()
    }

    /// Move the cursor past the current goal, wrapping on patrol loops.
    pub fn advance(&mut self) {
        if self.goals.is_empty() {
            return;
        }
        if self.patrol {
            self.cursor = (self.cursor + 1) % self.goals.len();
        } else if self.cursor < self.goals.len() {
            self.cursor += 1;
        }
    }

    pub fn push(&mut self, goal: Vec3) {
        self.goals.push(goal);
    }

    pub fn set_patrol(&mut self, patrol: bool) {
        self.patrol = patrol;
    }

    #[must_use]
    pub fn is_patrol(&self) -> bool {
        self.patrol
    }

    pub fn clear(&mut self) {
        self.goals.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

/// A robot in the team.
///
/// Agents are never destroyed; resource exhaustion only changes the mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    pub class: AgentClass,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Planar speed limit per tick.
    pub speed: f32,
    /// Base position; destination of every forced return.
    pub home: Vec3,
    pub battery: Battery,
    /// Remaining extinguisher charges; zero for perception-only agents.
    pub tank: u32,
    pub goals: GoalQueue,
    pub mode: AgentMode,
    /// Fraction of in-view cells this agent extinguishes per action.
    pub suppression_confidence: f32,
    /// False once the agent completed a forced return; it stays docked.
    pub active: bool,
}

impl Agent {
    /// Build an agent from its scenario record.
    ///
    /// The agent starts at its home position at the lowest allowed
    /// altitude.
    #[must_use]
    pub fn from_spec(id: usize, spec: &AgentSpec, suppression_confidence: f32) -> Self {
        let caps = spec.class.capabilities();
        let home = Vec3::new(spec.home[0], spec.home[1], caps.altitude_bounds.0);
        Self {
            id,
            class: spec.class,
            position: home,
            velocity: Vec3::zeros(),
            speed: spec.speed,
            home,
            battery: Battery::new(
                spec.battery_capacity,
                spec.battery_distance_cost,
                spec.battery_wait_cost,
            ),
            tank: if caps.can_suppress { spec.tank_capacity } else { 0 },
            goals: GoalQueue::default(),
            mode: AgentMode::Idle,
            suppression_confidence,
            active: true,
        }
    }

    #[must_use]
    pub fn capabilities(&self) -> ClassCapabilities {
        self.class.capabilities()
    }

    /// Queue a goal, clamping its altitude into the class envelope.
    pub fn push_goal(&mut self, goal: Vec3) {
        let (lo, hi) = self.capabilities().altitude_bounds;
        self.goals.push(Vec3::new(goal.x, goal.y, goal.z.clamp(lo, hi)));
    }

    /// Change altitude; only sensing-capable classes fly a vertical
    /// envelope, others ignore the request.
    pub fn set_altitude(&mut self, altitude: f32) {
        let caps = self.capabilities();
        if !caps.can_sense {
            return;
        }
        let (lo, hi) = caps.altitude_bounds;
        self.position.z = altitude.clamp(lo, hi);
    }

    /// Sensing confidence at the current altitude.
    ///
    /// Interpolates linearly from 1.0 at the lowest allowed altitude to
    /// 0.4 at the highest; 1.0 when the envelope is a single altitude.
    #[must_use]
    pub fn sensing_confidence(&self) -> f32 {
        let (lo, hi) = self.capabilities().altitude_bounds;
        if lo >= hi {
            return 1.0;
        }
        1.0 - (self.position.z - lo) / (hi - lo) * 0.6
    }

    /// Spend one extinguisher charge; an empty tank forces the agent home.
    pub fn consume_tank_charge(&mut self) {
        self.tank = self.tank.saturating_sub(1);
        if self.tank == 0 && self.active {
            self.mode = AgentMode::ForcedReturn;
        }
    }

    /// Whether the agent may currently sense.
    #[must_use]
    pub fn may_sense(&self) -> bool {
        self.active && self.mode != AgentMode::ForcedReturn && self.capabilities().can_sense
    }

    /// Whether the agent may currently suppress.
    #[must_use]
    pub fn may_suppress(&self) -> bool {
        self.active
            && self.mode != AgentMode::ForcedReturn
            && self.capabilities().can_suppress
            && self.tank > 0
    }
}
