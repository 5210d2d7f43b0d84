//! MCTS tree node representation.
//!
//! Each node is a position reached by a joint move from its parent. Moves
//! are simultaneous, so statistics are decoupled: every role keeps its own
//! visit count and accumulated score per legal choice, and selection picks
//! each role's choice independently.

use std::mem::size_of;

use propnet_core::{JointMove, Position};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Per-role statistics over that role's legal choices.
#[derive(Debug, Clone, Default)]
pub struct RoleStats {
    /// Legal choices, ascending.
    pub choices: Vec<u32>,

    /// Times each choice was selected through this node.
    pub visits: Vec<u32>,

    /// Sum of normalised scores backed up through each choice.
    pub score_sum: Vec<f64>,
}

impl RoleStats {
    pub fn new(choices: Vec<u32>) -> Self {
        let n = choices.len();
        Self {
            choices,
            visits: vec![0; n],
            score_sum: vec![0.0; n],
        }
    }

    /// Slot of `choice`, if it is legal here.
    #[inline]
    pub fn slot(&self, choice: u32) -> Option<usize> {
        self.choices.binary_search(&choice).ok()
    }

    #[inline]
    pub fn mean(&self, slot: usize) -> f64 {
        if self.visits[slot] == 0 {
            0.0
        } else {
            self.score_sum[slot] / self.visits[slot] as f64
        }
    }

    /// UCB1 argmax. Unvisited choices come first; ties keep the lower slot.
    pub fn select(&self, parent_visits: u32, c: f64) -> usize {
        let ln_n = (parent_visits.max(1) as f64).ln();
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for slot in 0..self.choices.len() {
            let n = self.visits[slot];
            if n == 0 {
                return slot;
            }
            let score = self.mean(slot) + c * (ln_n / n as f64).sqrt();
            if score > best_score {
                best_score = score;
                best = slot;
            }
        }
        best
    }

    /// Slot with the most visits; ties keep the lower slot.
    pub fn most_visited(&self) -> usize {
        let mut best = 0;
        for slot in 1..self.visits.len() {
            if self.visits[slot] > self.visits[best] {
                best = slot;
            }
        }
        best
    }

    fn heap_bytes(&self) -> usize {
        self.choices.capacity() * size_of::<u32>()
            + self.visits.capacity() * size_of::<u32>()
            + self.score_sum.capacity() * size_of::<f64>()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Position at this node
    pub position: Position,

    /// Number of times this node has been visited
    pub visits: u32,

    /// Per-role choice statistics. Empty at terminal nodes.
    pub roles: Vec<RoleStats>,

    /// Normalised goal values, one per role. Only set at terminal nodes.
    pub terminal_scores: Option<Vec<f64>>,

    /// Expanded joint moves, in discovery order.
    pub children: Vec<(JointMove, NodeId)>,
}

impl MctsNode {
    pub fn new(parent: NodeId, position: Position, legal: Vec<Vec<u32>>) -> Self {
        Self {
            parent,
            position,
            visits: 0,
            roles: legal.into_iter().map(RoleStats::new).collect(),
            terminal_scores: None,
            children: Vec::new(),
        }
    }

    pub fn new_terminal(parent: NodeId, position: Position, scores: Vec<f64>) -> Self {
        Self {
            parent,
            position,
            visits: 0,
            roles: Vec::new(),
            terminal_scores: Some(scores),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal_scores.is_some()
    }

    /// Child reached by `joint`, if already expanded.
    pub fn child(&self, joint: &JointMove) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(j, _)| j == joint)
            .map(|(_, id)| *id)
    }

    /// Approximate heap plus inline footprint in bytes.
    pub fn memory_bytes(&self) -> usize {
        size_of::<Self>()
            + self.position.heap_bytes()
            + self.roles.capacity() * size_of::<RoleStats>()
            + self.roles.iter().map(RoleStats::heap_bytes).sum::<usize>()
            + self
                .terminal_scores
                .as_ref()
                .map_or(0, |s| s.capacity() * size_of::<f64>())
            + self
                .children
                .iter()
                .map(|(j, _)| child_entry_bytes(j))
                .sum::<usize>()
    }
}

/// Bytes charged for one `(JointMove, NodeId)` child entry.
#[inline]
pub(crate) fn child_entry_bytes(joint: &JointMove) -> usize {
    size_of::<(JointMove, NodeId)>() + joint.len() * size_of::<u32>()
}
