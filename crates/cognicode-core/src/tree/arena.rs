//! Arena-backed search tree.

use super::node::{Node, NodeId};

/// The search tree. The root lives at index 0 and is never removed; nodes
/// reference each other by index only.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub const ROOT: NodeId = 0;

    pub fn new(root_state: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_state.into(), None)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Append a child under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, state: String) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(state, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    pub fn mark_fully_expanded(&mut self, id: NodeId) {
        self.nodes[id].is_fully_expanded = true;
    }

    pub fn mark_terminal(&mut self, id: NodeId) {
        self.nodes[id].is_terminal = true;
    }

    /// UCB1 score of `id` relative to its parent.
    pub fn confidence_score(&self, id: NodeId, exploration_weight: f64) -> f64 {
        let node = &self.nodes[id];
        let parent_visits = node.parent.map_or(1, |p| self.nodes[p].visits);
        node.confidence_score(parent_visits, exploration_weight)
    }

    /// Child with the highest confidence score; the earliest child wins ties.
    pub fn best_child(&self, id: NodeId, exploration_weight: f64) -> Option<NodeId> {
        first_max_by(&self.nodes[id].children, |&c| {
            self.confidence_score(c, exploration_weight)
        })
    }

    /// Child with the most visits; the earliest child wins ties.
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        first_max_by(&self.nodes[id].children, |&c| self.nodes[c].visits as f64)
    }

    /// First node, in insertion order, whose program passed validation.
    pub fn terminal_node(&self) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.is_terminal)
    }

    /// `id` followed by each ancestor up to and including the root.
    pub fn path_to_root(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.nodes[n].parent)
    }

    /// Number of parent hops from `id` to the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.path_to_root(id).count() - 1
    }

    /// Add one visit and `reward` to `id` and every ancestor, child first.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            let node = &mut self.nodes[n];
            node.visits += 1;
            node.value += reward;
            cursor = node.parent;
        }
    }
}

fn first_max_by<F>(ids: &[NodeId], mut key: F) -> Option<NodeId>
where
    F: FnMut(&NodeId) -> f64,
{
    let mut best: Option<(NodeId, f64)> = None;
    for id in ids {
        let score = key(id);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((*id, score)),
        }
    }
    best.map(|(id, _)| id)
}

/// Append `fragment` to `parent`, separated by a newline unless the parent is
/// empty, already ends with one, or the fragment starts with one.
///
/// Leading indentation in `fragment` is kept verbatim.
pub fn join_state(parent: &str, fragment: &str) -> String {
    if parent.is_empty() || parent.ends_with('\n') || fragment.starts_with('\n') {
        format!("{parent}{fragment}")
    } else {
        format!("{parent}\n{fragment}")
    }
}
