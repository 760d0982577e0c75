//! Joint Perception-Action Wildfire Simulation Core
//!
//! Simulates a wildfire spreading over a 2D terrain while a heterogeneous
//! team of robotic agents (perception, suppression, hybrid) senses and
//! extinguishes it under battery and tank constraints. The crate owns the
//! environment dynamics and the reward signal; rendering, scenario editing
//! and persistence live outside and only exchange plain configuration
//! records and per-tick snapshots with the core.
//!
//! ## Structure
//!
//! - [`fire`]: the stochastic fire field (ignition, intensity, simplified
//!   FARSITE propagation, decay, pruning) and the cell tracking sets
//! - [`agents`]: agent classes, per-agent state and the motion controller
//! - [`sensing`]: field-of-view detection and suppression
//! - [`coordination`]: communication adjacency and shaped rewards
//! - [`scoring`]: completion percentages and the time-discounted penalty
//! - [`simulation`]: the tick-driven orchestrator tying it all together
//!
//! Every stochastic draw flows through an explicit seeded generator, so a
//! scenario plus a seed pins the entire episode.

pub mod agents;
pub mod coordination;
pub mod core_types;
pub mod fire;
pub mod scenario;
pub mod scoring;
pub mod sensing;
pub mod simulation;
pub mod targets;

// Re-export core types
pub use core_types::{CellCoord, SimRng, Vec3};

// Re-export the main surface
pub use agents::{Agent, AgentClass, AgentMode};
pub use coordination::{compute_adjacency, AdjacencyGraph, RewardConfig, RewardEngine, RewardFn};
pub use fire::{FireField, FireSpot, FireTracker, GeoPhysField};
pub use scenario::{AgentSpec, HotspotArea, ScenarioConfig, ScenarioError, TargetSpec};
pub use scoring::ScoreReport;
pub use sensing::{sense, suppress, FovRect};
pub use simulation::snapshot::TickSnapshot;
pub use simulation::{AgentCommand, Simulation, TickReport};
pub use targets::{TargetCategory, TargetRegion};
