//! Discrete communication adjacency between agents.
//!
//! Two agents can talk iff every positional axis differs by at most the
//! hop range, i.e. they share a Chebyshev ball. The graph is rebuilt from
//! scratch every tick; pairs are recorded per capability combination so
//! the reward can weigh cross-class links separately.

use crate::agents::Agent;

/// Chebyshev-ball membership test.
#[must_use]
pub fn adjacent(a: &Agent, b: &Agent, hop: f32) -> bool {
    (a.position.x - b.position.x).abs() <= hop
        && (a.position.y - b.position.y).abs() <= hop
        && (a.position.z - b.position.z).abs() <= hop
}

/// Per-tick communication graph.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    /// Pairs where both endpoints can sense.
    pub perception_pairs: Vec<(usize, usize)>,
    /// Pairs linking a sensing endpoint with a suppressing endpoint.
    pub cross_pairs: Vec<(usize, usize)>,
    /// Pairs where both endpoints can suppress.
    pub action_pairs: Vec<(usize, usize)>,
    connected: Vec<bool>,
    cross_connected: Vec<bool>,
}

impl AdjacencyGraph {
    /// Whether the agent has at least one communication partner.
    #[must_use]
    pub fn is_connected(&self, id: usize) -> bool {
        self.connected.get(id).copied().unwrap_or(false)
    }

    /// Whether the agent is on at least one cross-class link.
    #[must_use]
    pub fn has_cross_link(&self, id: usize) -> bool {
        self.cross_connected.get(id).copied().unwrap_or(false)
    }

    /// Agents with no communication partner at all.
    #[must_use]
    pub fn isolated_count(&self) -> usize {
        self.connected.iter().filter(|c| !**c).count()
    }

    /// Agents missing a cross-class link.
    #[must_use]
    pub fn cross_isolated_count(&self) -> usize {
        self.cross_connected.iter().filter(|c| !**c).count()
    }
}

/// Build the communication graph for the current agent poses.
///
/// A hybrid endpoint counts as both sensing and suppressing, so a pair of
/// hybrids contributes to all three pair classes.
#[must_use]
pub fn compute_adjacency(agents: &[Agent], hop: f32) -> AdjacencyGraph {
    let n = agents.len();
    let mut graph = AdjacencyGraph {
        connected: vec![false; n],
        cross_connected: vec![false; n],
        ..AdjacencyGraph::default()
    };

    for i in 0..n {
        for j in (i + 1)..n {
            if !adjacent(&agents[i], &agents[j], hop) {
                continue;
            }
            graph.connected[i] = true;
            graph.connected[j] = true;

            let (ci, cj) = (agents[i].capabilities(), agents[j].capabilities());
            if ci.can_sense && cj.can_sense {
                graph.perception_pairs.push((i, j));
            }
            if ci.can_suppress && cj.can_suppress {
                graph.action_pairs.push((i, j));
            }
            let cross = (ci.can_sense && cj.can_suppress) || (ci.can_suppress && cj.can_sense);
            if cross {
                graph.cross_pairs.push((i, j));
                graph.cross_connected[i] = true;
                graph.cross_connected[j] = true;
            }
        }
    }
    graph
}
