//! Search node: one candidate program state plus its statistics.

use serde::{Deserialize, Serialize};

/// Index of a node inside the [`SearchTree`](super::SearchTree) arena.
pub type NodeId = usize;

/// Default UCB1 exploration weight (√2).
pub const DEFAULT_EXPLORATION_WEIGHT: f64 = std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Full program text from the root down to this node.
    pub state: String,
    /// Back-reference used by backpropagation. `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in expansion order. Append-only.
    pub children: Vec<NodeId>,
    pub visits: u32,
    /// Sum of rewards backpropagated through this node.
    pub value: f64,
    /// A rollout of this exact state passed the harness.
    pub is_terminal: bool,
    pub is_fully_expanded: bool,
}

impl Node {
    pub(crate) fn new(state: String, parent: Option<NodeId>) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            visits: 0,
            value: 0.0,
            is_terminal: false,
            is_fully_expanded: false,
        }
    }

    /// Mean reward, or 0 for an unvisited node.
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }

    /// UCB1 score given the parent's visit count.
    ///
    /// Unvisited nodes score `+∞` so they are always explored first.
    /// `parent_visits` is floored at 1 so the logarithm stays defined.
    pub fn confidence_score(&self, parent_visits: u32, exploration_weight: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = parent_visits.max(1) as f64;
        let visits = self.visits as f64;
        self.mean_value() + exploration_weight * (parent_visits.ln() / visits).sqrt()
    }
}
