//! Goal-directed motion controller.
//!
//! One call per agent per tick. The controller owns the mode transitions:
//! goal traversal while resources last, a forced return home once the
//! battery or tank runs out, and permanent docking after the return.

use crate::agents::state::{Agent, AgentMode};
use crate::core_types::Vec3;
use tracing::debug;

impl Agent {
    /// Advance the agent by one tick of duration `dt`.
    ///
    /// While a goal is queued: move toward it at the speed limit, or snap
    /// onto it when closer than one step, advancing the cursor (wrapping
    /// on patrol loops) and booking one wait tick. With no goal left the
    /// agent waits in place, still paying the per-wait battery cost.
    ///
    /// Battery exhaustion flips the mode to [`AgentMode::ForcedReturn`];
    /// from then on the agent heads straight home and docks on arrival.
    pub fn step(&mut self, dt: f32) {
        if !self.active {
            self.velocity = Vec3::zeros();
            return;
        }

        match self.mode {
            AgentMode::ForcedReturn => self.step_toward_home(dt),
            AgentMode::Idle | AgentMode::Moving => {
                self.step_toward_goal(dt);
                if self.battery.is_exhausted() && self.mode != AgentMode::ForcedReturn {
                    debug!("agent {} battery exhausted, forcing return", self.id);
                    self.mode = AgentMode::ForcedReturn;
                }
            }
        }
    }

    fn step_toward_goal(&mut self, dt: f32) {
        let Some(goal) = self.goals.current() else {
            // Nothing queued; hold position and pay the waiting cost.
            self.velocity = Vec3::zeros();
            self.battery.record_wait();
            self.mode = AgentMode::Idle;
            return;
        };

        let to_goal = goal - self.position;
        let distance = to_goal.norm();
        let step = self.speed * dt;

        if distance >= step && distance > 0.0 {
            let direction = to_goal / distance;
            self.velocity = direction * self.speed;
            self.position += direction * step;
            self.battery.record_travel(step);
            self.mode = AgentMode::Moving;
        } else {
            // Close enough to snap onto the goal this tick.
            self.position = goal;
            self.velocity = Vec3::zeros();
            self.battery.record_travel(distance);
            self.battery.record_wait();
            self.goals.advance();
            self.mode = if self.goals.current().is_some() {
                AgentMode::Moving
            } else {
                AgentMode::Idle
            };
        }
    }

    fn step_toward_home(&mut self, dt: f32) {
        let to_home = self.home - self.position;
        let distance = to_home.norm();
        let step = self.speed * dt;

        if distance >= step && distance > 0.0 {
            let direction = to_home / distance;
            self.velocity = direction * self.speed;
            self.position += direction * step;
        } else {
            self.position = self.home;
            self.velocity = Vec3::zeros();
            self.goals.clear();
            self.mode = AgentMode::Idle;
            self.active = false;
            debug!("agent {} docked at base", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::class::AgentClass;
    use crate::scenario::AgentSpec;

    fn agent_with_battery(capacity: f32, k_distance: f32, k_wait: f32) -> Agent {
        Agent::from_spec(
            0,
            &AgentSpec {
                class: AgentClass::Perception,
                home: [0.0, 0.0],
                speed: 5.0,
                battery_capacity: capacity,
                battery_distance_cost: k_distance,
                battery_wait_cost: k_wait,
                tank_capacity: 0,
            },
            0.0,
        )
    }

    #[test]
    fn test_moves_at_speed_limit_toward_goal() {
        let mut agent = agent_with_battery(1e6, 0.0, 0.0);
        agent.push_goal(Vec3::new(100.0, 0.0, 5.0));
        agent.step(1.0);
        assert_eq!(agent.mode, AgentMode::Moving);
        assert!((agent.position.x - 5.0).abs() < 1e-4);
        assert!((agent.velocity.norm() - agent.speed).abs() < 1e-4);
    }

    #[test]
    fn test_snaps_onto_goal_and_advances_cursor() {
        let mut agent = agent_with_battery(1e6, 0.0, 0.0);
        agent.push_goal(Vec3::new(3.0, 0.0, 5.0));
        agent.push_goal(Vec3::new(3.0, 50.0, 5.0));
        agent.step(1.0);
        assert_eq!(agent.position.x, 3.0);
        assert_eq!(agent.mode, AgentMode::Moving, "next goal is queued");
        agent.step(1.0);
        assert!(agent.position.y > 0.0, "now heading to the second goal");
    }

    #[test]
    fn test_waits_at_final_goal() {
        let mut agent = agent_with_battery(1e6, 0.0, 1.0);
        agent.push_goal(Vec3::new(2.0, 0.0, 5.0));
        agent.step(1.0); // snap + 1 wait
        agent.step(1.0); // idle wait
        agent.step(1.0); // idle wait
        assert_eq!(agent.mode, AgentMode::Idle);
        assert_eq!(agent.battery.consumed(), 3.0);
    }

    #[test]
    fn test_forced_return_triggers_exactly_once_at_capacity() {
        // 0.1 per distance unit against a 500 capacity: exhaustion lands
        // exactly at 5000 traveled distance.
        let mut agent = agent_with_battery(500.0, 0.1, 0.05);
        agent.push_goal(Vec3::new(10_000.0, 0.0, 5.0));

        let mut transitions = 0;
        let mut ticks_to_exhaustion = 0;
        for tick in 1..=1200 {
            let before = agent.mode;
            agent.step(1.0);
            if before != AgentMode::ForcedReturn && agent.mode == AgentMode::ForcedReturn {
                transitions += 1;
                ticks_to_exhaustion = tick;
            }
        }
        assert_eq!(transitions, 1);
        // 5 distance per tick, 5000 distance to burn 500 at 0.1 each.
        assert_eq!(ticks_to_exhaustion, 1000);
        assert_eq!(agent.battery.remaining(), 0.0);
    }

    #[test]
    fn test_forced_return_flies_home_and_docks() {
        let mut agent = agent_with_battery(1e6, 0.0, 0.0);
        agent.position = Vec3::new(30.0, 40.0, 5.0);
        agent.mode = AgentMode::ForcedReturn;

        for _ in 0..20 {
            agent.step(1.0);
        }
        assert_eq!(agent.position, agent.home);
        assert_eq!(agent.mode, AgentMode::Idle);
        assert!(!agent.active, "a returned agent stays docked");

        // A docked agent ignores further goals and pays nothing.
        let consumed = agent.battery.consumed();
        agent.push_goal(Vec3::new(50.0, 50.0, 5.0));
        agent.step(1.0);
        assert_eq!(agent.position, agent.home);
        assert_eq!(agent.battery.consumed(), consumed);
    }

    #[test]
    fn test_patrol_loop_revisits_goals() {
        let mut agent = agent_with_battery(1e6, 0.0, 0.0);
        agent.goals.set_patrol(true);
        agent.push_goal(Vec3::new(5.0, 0.0, 5.0));
        agent.push_goal(Vec3::new(0.0, 0.0, 5.0));

        for _ in 0..8 {
            agent.step(1.0);
        }
        // Still cycling between the two goals, never idle.
        assert!(agent.goals.current().is_some());
        assert_ne!(agent.mode, AgentMode::Idle);
    }

    #[test]
    fn test_battery_never_negative() {
        let mut agent = agent_with_battery(10.0, 1.0, 1.0);
        agent.push_goal(Vec3::new(1000.0, 0.0, 5.0));
        for _ in 0..50 {
            agent.step(1.0);
            assert!(agent.battery.remaining() >= 0.0);
        }
    }
}
