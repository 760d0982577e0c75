//! Tick-driven simulation orchestrator.
//!
//! Owns the fire field, the agent team, the tracking sets and the reward
//! and scoring engines, and enforces the fixed per-tick order:
//!
//! 1. fire propagation (including delayed-area ignition),
//! 2. fire bookkeeping (front merge, decay, burn-out pruning),
//! 3. per-agent motion,
//! 4. per-agent sensing then suppression, in agent-id order so two agents
//!    can never double-credit the same cell within a tick,
//! 5. adjacency and rewards,
//! 6. scoring and termination checks.
//!
//! Single-threaded by design; all randomness flows through the one seeded
//! generator owned by the simulation.

pub mod snapshot;

use crate::agents::{Agent, AgentClass};
use crate::coordination::{
    compute_adjacency, AdjacencyGraph, ContributionLedger, RewardConfig, RewardEngine,
};
use crate::core_types::{SimRng, Vec3};
use crate::fire::field::FireSpot;
use crate::fire::{FireField, FireTracker};
use crate::scenario::{ScenarioConfig, ScenarioError};
use crate::scoring::{compute_score, ScoreReport, ScoringParams};
use crate::sensing::{sense, suppress};
use crate::targets::TargetRegion;
use snapshot::{sorted_cells, AgentSnapshot, TickSnapshot};
use tracing::{debug, info};

/// Host instructions for one agent for one tick.
#[derive(Debug, Clone, Default)]
pub struct AgentCommand {
    /// Append a goal to the agent's queue.
    pub goal: Option<Vec3>,
    /// Request an altitude change; ignored for classes that cannot fly a
    /// vertical envelope.
    pub altitude: Option<f32>,
    /// Attempt an extinguisher dump this tick.
    pub suppress: bool,
}

/// What one tick produced, for the host loop.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u32,
    /// Scalar team reward under the configured reward function.
    pub global_reward: f32,
    /// Blended per-agent rewards.
    pub rewards: Vec<f32>,
    pub score: ScoreReport,
    /// Episode over: duration elapsed or completion threshold reached.
    pub done: bool,
    /// Completion threshold reached before the duration ran out.
    pub won: bool,
}

/// The complete environment state of one episode.
pub struct Simulation {
    config: ScenarioConfig,
    rng: SimRng,
    tick: u32,
    field: FireField,
    tracker: FireTracker,
    targets: Vec<TargetRegion>,
    agents: Vec<Agent>,
    ledger: ContributionLedger,
    reward_engine: RewardEngine,
    adjacency: AdjacencyGraph,
    burnt_out: Vec<FireSpot>,
    done: bool,
    won: bool,
}

impl Simulation {
    /// Validate the scenario and build the initial state.
    ///
    /// Hotspot areas without an ignition delay are already burning when
    /// this returns.
    ///
    /// # Errors
    ///
    /// Fails fast on any invalid scenario parameter; no partial state is
    /// ever constructed.
    pub fn new(
        config: ScenarioConfig,
        reward: RewardConfig,
        seed: u64,
    ) -> Result<Self, ScenarioError> {
        config.validate()?;
        info!(
            "starting scenario: world {}x{}, {} hotspot areas, {} agents, seed {}",
            config.world_size,
            config.world_size,
            config.hotspots.len(),
            config.agents.len(),
            seed
        );

        let mut rng = SimRng::seed_from_u64(seed);
        let mut field = FireField::new(
            config.world_size,
            config.fire.clone(),
            &config.hotspots,
            &mut rng,
        );
        let mut targets: Vec<TargetRegion> =
            config.targets.iter().map(TargetRegion::from_spec).collect();
        let mut tracker = FireTracker::new(config.world_size);

        let initial_spots = field.ignite_due(0, &mut rng);
        tracker.merge_front(&initial_spots, &mut targets);

        let agents: Vec<Agent> = config
            .agents
            .iter()
            .enumerate()
            .map(|(id, spec)| {
                let confidence = match spec.class {
                    AgentClass::Suppression => config.action_pruning_confidence,
                    AgentClass::Hybrid => config.hybrid_pruning_confidence,
                    AgentClass::Perception => 0.0,
                };
                Agent::from_spec(id, spec, confidence)
            })
            .collect();
        let agent_count = agents.len();

        Ok(Self {
            config,
            rng,
            tick: 0,
            field,
            tracker,
            targets,
            agents,
            ledger: ContributionLedger::new(agent_count),
            reward_engine: RewardEngine::new(reward),
            adjacency: AdjacencyGraph::default(),
            burnt_out: Vec::new(),
            done: false,
            won: false,
        })
    }

    /// Advance the environment by one tick.
    ///
    /// `commands` is indexed by agent id; missing entries mean "keep
    /// doing what you were doing".
    pub fn step(&mut self, commands: &[AgentCommand]) -> TickReport {
        self.tick += 1;
        let dt = self.config.fire.time_step;

        // 1. Fire propagation.
        let ignited = self.field.ignite_due(self.tick, &mut self.rng);
        let new_front = self
            .field
            .propagate(self.tick, self.tracker.pruned(), &mut self.rng);

        // 2. Fire bookkeeping.
        self.tracker.merge_front(&ignited, &mut self.targets);
        self.tracker.merge_front(&new_front, &mut self.targets);
        let burnt = self.field.decay_and_prune(self.tick);
        self.burnt_out.extend(burnt);
        self.tracker.debug_validate();

        // 3. Per-agent motion.
        for (i, agent) in self.agents.iter_mut().enumerate() {
            if let Some(command) = commands.get(i) {
                if let Some(altitude) = command.altitude {
                    agent.set_altitude(altitude);
                }
                if let Some(goal) = command.goal {
                    agent.push_goal(goal);
                }
            }
            agent.step(dt);
        }

        // 4. Sensing, then suppression, in agent-id order.
        for i in 0..self.agents.len() {
            if !self.agents[i].may_sense() {
                continue;
            }
            let confidence = self.agents[i].sensing_confidence();
            let detected = sense(&self.field, &self.agents[i], confidence, &mut self.rng);
            let newly = self.tracker.record_sensed(&detected);
            self.ledger.record_sensed(i, newly);
        }

        let mut suppress_actions_by = vec![0u32; self.agents.len()];
        for i in 0..self.agents.len() {
            let wants_dump = commands.get(i).is_some_and(|c| c.suppress);
            if !wants_dump || !self.agents[i].may_suppress() {
                continue;
            }
            suppress_actions_by[i] = 1;
            let confidence = self.agents[i].suppression_confidence;
            let outcome = suppress(
                &mut self.tracker,
                &mut self.targets,
                &mut self.agents[i],
                confidence,
                &mut self.rng,
            );
            self.ledger.record_pruned(i, outcome.extinguished.len() as u32);
        }
        self.tracker.debug_validate();

        // 5. Adjacency and rewards.
        self.adjacency = compute_adjacency(&self.agents, self.config.comm_hop);
        let active = self.tracker.on_fire_count();
        let mut reward = self.reward_engine.compute(
            &self.ledger,
            &self.adjacency,
            active,
            &suppress_actions_by,
        );

        // 6. Scoring and termination.
        let score = self.score();
        let completion = score.overall_completion / 100.0;
        if completion >= self.config.completion_threshold {
            self.done = true;
            self.won = true;
            let bonus = self.reward_engine.config().completion_bonus;
            reward.global += bonus;
            for r in &mut reward.per_agent {
                *r += bonus;
            }
            info!(
                "episode won at tick {}: {:.1}% extinguished",
                self.tick, score.overall_completion
            );
        }
        if self.tick >= self.config.duration {
            self.done = true;
        }

        debug!(
            "tick {}: {} burning cells, {} sensed, {} pruned, reward {:.2}",
            self.tick,
            self.tracker.on_fire_count(),
            self.tracker.sensed_count(),
            self.tracker.pruned_count(),
            reward.global
        );

        TickReport {
            tick: self.tick,
            global_reward: reward.global,
            rewards: reward.per_agent,
            score,
            done: self.done,
            won: self.won,
        }
    }

    /// Current score metrics.
    #[must_use]
    pub fn score(&self) -> ScoreReport {
        let delays: Vec<u32> = self
            .config
            .hotspots
            .iter()
            .map(|h| h.ignition_delay)
            .collect();
        let params = ScoringParams {
            facility_penalties: &self.config.facility_penalties,
            fire_weight: self.config.fire_propagation_weight,
            temporal_exponent: self.config.temporal_penalty_exponent,
            ignition_delays: &delays,
        };
        compute_score(
            self.tracker.on_fire_count(),
            self.tracker.sensed_count(),
            self.tracker.pruned_count(),
            &self.targets,
            &params,
            self.tick as f32 * self.config.fire.time_step,
        )
    }

    /// Freeze the current state for rendering or persistence.
    #[must_use]
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            tick: self.tick,
            spots: self.field.active_spots().copied().collect(),
            on_fire: sorted_cells(self.tracker.on_fire().iter()),
            sensed: sorted_cells(self.tracker.sensed().iter()),
            pruned: sorted_cells(self.tracker.pruned().iter()),
            burnt_out: self.burnt_out.clone(),
            agents: self.agents.iter().map(AgentSnapshot::of).collect(),
            targets: self.targets.clone(),
            score: self.score(),
        }
    }

    #[must_use]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn agent_mut(&mut self, id: usize) -> &mut Agent {
        &mut self.agents[id]
    }

    #[must_use]
    pub fn tracker(&self) -> &FireTracker {
        &self.tracker
    }

    #[must_use]
    pub fn targets(&self) -> &[TargetRegion] {
        &self.targets
    }

    #[must_use]
    pub fn field(&self) -> &FireField {
        &self.field
    }

    #[must_use]
    pub fn adjacency(&self) -> &AdjacencyGraph {
        &self.adjacency
    }

    #[must_use]
    pub fn ledger(&self) -> &ContributionLedger {
        &self.ledger
    }
}
