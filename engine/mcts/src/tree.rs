//! MCTS tree structure with arena allocation.
//!
//! Nodes live in a contiguous Vec and are referenced by NodeId indices.
//! Moving the root down after a real move compacts the arena: the kept
//! subtree is renumbered breadth-first and everything else is dropped.

use std::collections::VecDeque;

use propnet_core::JointMove;
use tracing::debug;

use crate::node::{child_entry_bytes, MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after construction or reroot)
    root: NodeId,

    /// Running estimate of the tree's footprint in bytes
    memory: usize,
}

impl MctsTree {
    /// Create a new tree holding only `root`.
    pub fn new(mut root: MctsNode) -> Self {
        root.parent = NodeId::NONE;
        let memory = root.memory_bytes();
        Self {
            nodes: vec![root],
            root: NodeId(0),
            memory,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.memory += node.memory_bytes();
        self.nodes.push(node);
        id
    }

    /// Allocate `child` under `parent`, reached by `joint`.
    pub fn add_child(&mut self, parent: NodeId, joint: JointMove, mut child: MctsNode) -> NodeId {
        child.parent = parent;
        let child_id = self.allocate(child);
        self.memory += child_entry_bytes(&joint);
        self.get_mut(parent).children.push((joint, child_id));
        child_id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Estimated footprint in bytes.
    #[inline]
    pub fn memory(&self) -> usize {
        self.memory
    }

    /// Make `new_root` the root, keeping only its subtree.
    ///
    /// Survivors are renumbered in breadth-first order, so the new root
    /// becomes `NodeId(0)` and the arena holds no unreachable nodes.
    pub fn reroot(&mut self, new_root: NodeId) {
        let old_len = self.nodes.len();
        let mut remap = vec![NodeId::NONE; old_len];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([new_root]);

        while let Some(id) = queue.pop_front() {
            remap[id.0 as usize] = NodeId(order.len() as u32);
            order.push(id);
            queue.extend(self.get(id).children.iter().map(|(_, child)| *child));
        }

        let mut old: Vec<Option<MctsNode>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        let mut nodes = Vec::with_capacity(order.len());
        let mut memory = 0;
        for id in order {
            let Some(mut node) = old[id.0 as usize].take() else {
                continue;
            };
            node.parent = if id == new_root {
                NodeId::NONE
            } else {
                remap[node.parent.0 as usize]
            };
            for (_, child) in node.children.iter_mut() {
                *child = remap[child.0 as usize];
            }
            memory += node.memory_bytes();
            nodes.push(node);
        }

        debug!(
            kept = nodes.len(),
            dropped = old_len - nodes.len(),
            "Rerooted search tree"
        );
        self.nodes = nodes;
        self.root = NodeId(0);
        self.memory = memory;
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: self.get(self.root).visits,
            max_depth: self.compute_max_depth(),
            memory: self.memory,
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.get(id).children.iter().map(|(_, c)| (*c, depth + 1)));
        }
        max_depth
    }

    /// Log the top `depth` levels of the tree at debug level.
    pub fn dump(&self, depth: u32) {
        if depth == 0 {
            return;
        }
        let root = self.get(self.root);
        for (role, stats) in root.roles.iter().enumerate() {
            for (slot, choice) in stats.choices.iter().enumerate() {
                debug!(
                    role,
                    choice,
                    visits = stats.visits[slot],
                    mean = stats.mean(slot),
                    "Root choice"
                );
            }
        }
        self.dump_children(self.root, 1, depth);
    }

    fn dump_children(&self, id: NodeId, level: u32, depth: u32) {
        if level > depth {
            return;
        }
        for (joint, child) in &self.get(id).children {
            let node = self.get(*child);
            debug!(
                level,
                joint = ?joint.as_slice(),
                visits = node.visits,
                terminal = node.is_terminal(),
                "Tree node"
            );
            self.dump_children(*child, level + 1, depth);
        }
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
    pub memory: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use propnet_core::Position;

    fn node(bit: usize) -> MctsNode {
        let position = Position::from_indices(8, [bit]);
        MctsNode::new(NodeId::NONE, position, vec![vec![0, 1]])
    }

    fn joint(choice: u32) -> JointMove {
        JointMove::from_choices(vec![choice])
    }

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(node(0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
        assert!(tree.memory() > 0);
    }

    #[test]
    fn test_add_child() {
        let mut tree = MctsTree::new(node(0));
        let before = tree.memory();
        let child_id = tree.add_child(tree.root(), joint(1), node(1));

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));
        assert_eq!(tree.get(child_id).parent, tree.root());
        assert_eq!(tree.get(tree.root()).child(&joint(1)), Some(child_id));
        assert!(tree.memory() > before);
    }

    #[test]
    fn test_reroot_compacts_arena() {
        // 0 -> {1 -> {3, 4}, 2 -> {5}}
        let mut tree = MctsTree::new(node(0));
        let a = tree.add_child(tree.root(), joint(0), node(1));
        let b = tree.add_child(tree.root(), joint(1), node(2));
        let a0 = tree.add_child(a, joint(0), node(3));
        let a1 = tree.add_child(a, joint(1), node(4));
        tree.add_child(b, joint(0), node(5));
        tree.get_mut(a0).visits = 7;
        tree.get_mut(a1).visits = 9;

        tree.reroot(a);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root(), NodeId(0));
        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert!(root.position.get(1));

        let kept0 = root.child(&joint(0)).unwrap();
        let kept1 = root.child(&joint(1)).unwrap();
        assert_eq!(tree.get(kept0).visits, 7);
        assert_eq!(tree.get(kept1).visits, 9);
        assert_eq!(tree.get(kept0).parent, NodeId(0));
        assert!(tree.get(kept1).position.get(4));
    }

    #[test]
    fn test_reroot_recomputes_memory() {
        let mut tree = MctsTree::new(node(0));
        let a = tree.add_child(tree.root(), joint(0), node(1));
        tree.add_child(tree.root(), joint(1), node(2));
        let full = tree.memory();

        tree.reroot(a);
        assert!(tree.memory() < full);
        assert_eq!(tree.memory(), tree.get(tree.root()).memory_bytes());
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new(node(0));
        let a = tree.add_child(tree.root(), joint(0), node(1));
        tree.add_child(a, joint(1), node(2));

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.memory, tree.memory());
    }
}
