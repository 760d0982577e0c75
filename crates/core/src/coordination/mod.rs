//! Communication adjacency and reward shaping.

pub mod adjacency;
pub mod reward;

pub use adjacency::{compute_adjacency, AdjacencyGraph};
pub use reward::{ContributionLedger, RewardConfig, RewardEngine, RewardFn, RewardOutput};
