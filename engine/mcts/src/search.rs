//! MCTS player.
//!
//! Each search iteration runs the classic four phases over the evaluator:
//! 1. Selection: from the root, every role picks its UCB-best choice
//!    independently; descend while the resulting joint move is expanded
//! 2. Expansion: add the child for the first unexpanded joint move
//! 3. Simulation: random playout from the new child to a terminal position
//! 4. Backpropagation: add each role's normalised score to the choice that
//!    role made at every node on the path
//!
//! The tree survives between moves: applying a real move reroots it onto
//! the matching child.

use std::fmt;
use std::time::{Duration, Instant};

use propnet_core::{JointMove, Position, StateMachineInterface};
use tracing::{debug, info, trace};

use crate::config::MctsConfig;
use crate::node::{MctsNode, NodeId};
use crate::player::{Player, PlayerError};
use crate::playout::{FirstLegalPolicy, PlayoutPolicy, RandomPolicy};
use crate::tree::MctsTree;

/// Score backed up for a playout cut off before reaching a terminal.
const NEUTRAL_SCORE: f64 = 0.5;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The move deadline passed.
    Deadline,
    /// `max_tree_search_time` elapsed.
    TimeLimit,
    /// The tree reached `max_number_of_nodes`.
    NodeLimit,
    /// The tree's memory estimate reached `max_memory`.
    MemoryLimit,
    /// `max_tree_playout_iterations` playouts were run.
    PlayoutLimit,
    /// Only one move was legal and searching was skipped.
    SingleMove,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopReason::Deadline => "deadline",
            StopReason::TimeLimit => "time limit",
            StopReason::NodeLimit => "node limit",
            StopReason::MemoryLimit => "memory limit",
            StopReason::PlayoutLimit => "playout limit",
            StopReason::SingleMove => "single move",
        };
        f.write_str(name)
    }
}

/// Statistics from the most recent search.
#[derive(Debug, Clone)]
pub struct SearchStats {
    /// Playouts completed
    pub playouts: u64,
    /// Nodes in the tree when the search ended
    pub nodes: usize,
    /// Wall-clock time spent searching
    pub elapsed: Duration,
    /// Tree memory estimate in bytes when the search ended
    pub memory: usize,
    pub stop: StopReason,
}

/// Monte Carlo tree-search player for one role.
pub struct MctsPlayer<S> {
    sm: S,
    role: usize,
    config: MctsConfig,
    tree: Option<MctsTree>,
    random: RandomPolicy,
    first: FirstLegalPolicy,
    next: Position,
    last_search: Option<SearchStats>,
}

impl<S: StateMachineInterface> MctsPlayer<S> {
    /// Create a player for `role`, starting from the evaluator's initial position.
    pub fn new(sm: S, role: usize, config: MctsConfig) -> Self {
        Self::with_policy(sm, role, config, RandomPolicy::new())
    }

    /// Same as [`new`](Self::new) with reproducible playouts.
    pub fn with_seed(sm: S, role: usize, config: MctsConfig, seed: u64) -> Self {
        Self::with_policy(sm, role, config, RandomPolicy::with_seed(seed))
    }

    fn with_policy(mut sm: S, role: usize, config: MctsConfig, random: RandomPolicy) -> Self {
        sm.reset();
        Self {
            next: sm.new_base_state(),
            sm,
            role,
            config,
            tree: None,
            random,
            first: FirstLegalPolicy,
            last_search: None,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn state_machine(&self) -> &S {
        &self.sm
    }

    /// The search tree, if one has been built for the current position.
    pub fn tree(&self) -> Option<&MctsTree> {
        self.tree.as_ref()
    }

    /// Statistics of the most recent search, if any.
    pub fn last_search(&self) -> Option<&SearchStats> {
        self.last_search.as_ref()
    }

    /// Node for the evaluator's current position.
    fn make_node(&mut self, parent: NodeId) -> Result<MctsNode, PlayerError> {
        let position = self.sm.current().clone();
        if self.sm.is_terminal() {
            let scores = self.terminal_scores()?;
            return Ok(MctsNode::new_terminal(parent, position, scores));
        }
        let mut legal = Vec::with_capacity(self.sm.role_count());
        for role in 0..self.sm.role_count() {
            let choices = self.sm.legal_state(role)?;
            if choices.is_empty() {
                return Err(PlayerError::NoLegalMoves(role));
            }
            legal.push(choices.as_slice().to_vec());
        }
        Ok(MctsNode::new(parent, position, legal))
    }

    fn terminal_scores(&mut self) -> Result<Vec<f64>, PlayerError> {
        (0..self.sm.role_count())
            .map(|role| -> Result<f64, PlayerError> {
                Ok(self.sm.goal_value(role)? as f64 / 100.0)
            })
            .collect()
    }

    /// Take the kept tree if its root matches the current position, else build a fresh one.
    fn take_tree(&mut self) -> Result<MctsTree, PlayerError> {
        if let Some(tree) = self.tree.take() {
            if tree.get(tree.root()).position == *self.sm.current() {
                return Ok(tree);
            }
            debug!("Search tree out of sync with position, rebuilding");
        }
        Ok(MctsTree::new(self.make_node(NodeId::NONE)?))
    }

    /// Grow the tree until a budget or `deadline` is reached.
    fn search(&mut self, deadline: Instant) -> Result<SearchStats, PlayerError> {
        if self.sm.is_terminal() {
            return Err(PlayerError::GameOver);
        }
        let mut tree = self.take_tree()?;
        let root_position = tree.get(tree.root()).position.clone();

        let start = Instant::now();
        let mut next_log = start + self.config.next_time;
        let mut playouts = 0u64;

        let outcome = loop {
            let now = Instant::now();
            if let Some(reason) = self.budget_reached(&tree, start, now, deadline, playouts) {
                break Ok(reason);
            }
            if now >= next_log {
                debug!(
                    playouts,
                    nodes = tree.len(),
                    memory = tree.memory(),
                    "Search progress"
                );
                next_log = now + self.config.next_time;
            }
            if let Err(e) = self.iterate(&mut tree, &root_position) {
                break Err(e);
            }
            playouts += 1;
        };

        // Leave the evaluator where the match actually is.
        let restored = self.sm.update_bases(&root_position);
        // A failed iteration can leave an expanded child without its backup; drop the tree.
        let stop = outcome?;
        restored?;

        let stats = SearchStats {
            playouts,
            nodes: tree.len(),
            elapsed: start.elapsed(),
            memory: tree.memory(),
            stop,
        };
        tree.dump(self.config.dump_depth);
        self.tree = Some(tree);
        Ok(stats)
    }

    fn budget_reached(
        &self,
        tree: &MctsTree,
        start: Instant,
        now: Instant,
        deadline: Instant,
        playouts: u64,
    ) -> Option<StopReason> {
        if now >= deadline {
            Some(StopReason::Deadline)
        } else if now.duration_since(start) >= self.config.max_tree_search_time {
            Some(StopReason::TimeLimit)
        } else if playouts >= self.config.max_tree_playout_iterations {
            Some(StopReason::PlayoutLimit)
        } else if tree.len() >= self.config.max_number_of_nodes {
            Some(StopReason::NodeLimit)
        } else if tree.memory() >= self.config.max_memory {
            Some(StopReason::MemoryLimit)
        } else {
            None
        }
    }

    /// One select, expand, simulate, backpropagate pass.
    fn iterate(
        &mut self,
        tree: &mut MctsTree,
        root_position: &Position,
    ) -> Result<(), PlayerError> {
        self.sm.update_bases(root_position)?;
        let mut path: Vec<(NodeId, JointMove)> = Vec::new();
        let mut current = tree.root();

        let (leaf, scores) = loop {
            let node = tree.get(current);
            if let Some(scores) = &node.terminal_scores {
                break (current, scores.clone());
            }

            let mut joint = self.sm.joint_move();
            for (role, stats) in node.roles.iter().enumerate() {
                let slot = stats.select(node.visits, self.config.ucb_constant);
                joint.set(role, stats.choices[slot]);
            }
            let child = node.child(&joint);
            self.sm.next_state(&joint, &mut self.next)?;
            path.push((current, joint.clone()));

            match child {
                Some(child) => current = child,
                None => {
                    let node = self.make_node(current)?;
                    let child = tree.add_child(current, joint, node);
                    let scores = match &tree.get(child).terminal_scores {
                        Some(scores) => scores.clone(),
                        None => self.playout()?,
                    };
                    break (child, scores);
                }
            }
        };

        tree.get_mut(leaf).visits += 1;
        for (id, joint) in path.iter().rev() {
            let node = tree.get_mut(*id);
            node.visits += 1;
            for (role, stats) in node.roles.iter_mut().enumerate() {
                if let Some(slot) = stats.slot(joint.get(role)) {
                    stats.visits[slot] += 1;
                    stats.score_sum[slot] += scores[role];
                }
            }
        }

        trace!(
            depth = path.len(),
            leaf = leaf.0,
            score = scores[self.role],
            "MCTS iteration complete"
        );
        Ok(())
    }

    /// Random playout from the evaluator's current position.
    fn playout(&mut self) -> Result<Vec<f64>, PlayerError> {
        let mut joint = self.sm.joint_move();
        let mut depth = 0u32;
        while !self.sm.is_terminal() {
            if depth >= self.config.max_playout_depth {
                return Ok(vec![NEUTRAL_SCORE; self.sm.role_count()]);
            }
            let random = self.config.select_random_move_count == 0
                || depth < self.config.select_random_move_count;
            for role in 0..self.sm.role_count() {
                let legal = self.sm.legal_state(role)?;
                if legal.is_empty() {
                    return Err(PlayerError::NoLegalMoves(role));
                }
                let choice = if random {
                    self.random.choose(legal)
                } else {
                    self.first.choose(legal)
                };
                joint.set(role, choice);
            }
            self.sm.next_state(&joint, &mut self.next)?;
            depth += 1;
        }
        self.terminal_scores()
    }

    /// Most-visited root choice for our role; ties go to the lowest choice.
    fn best_choice(&self) -> Option<u32> {
        let tree = self.tree.as_ref()?;
        let stats = tree.get(tree.root()).roles.get(self.role)?;
        if stats.choices.is_empty() {
            return None;
        }
        Some(stats.choices[stats.most_visited()])
    }
}

impl<S: StateMachineInterface> Player for MctsPlayer<S> {
    fn name(&self) -> &str {
        "mcts"
    }

    fn role(&self) -> usize {
        self.role
    }

    fn on_meta_gaming(&mut self, deadline: Instant) -> Result<(), PlayerError> {
        if self.sm.is_terminal() {
            return Ok(());
        }
        let stats = self.search(deadline)?;
        info!(
            playouts = stats.playouts,
            nodes = stats.nodes,
            stop = %stats.stop,
            "Meta-gaming search finished"
        );
        self.last_search = Some(stats);
        Ok(())
    }

    fn on_apply_move(&mut self, joint: &JointMove) -> Result<(), PlayerError> {
        self.sm.next_state(joint, &mut self.next)?;

        let child = self
            .tree
            .as_ref()
            .and_then(|tree| tree.get(tree.root()).child(joint));
        match child {
            Some(child) => {
                if let Some(tree) = self.tree.as_mut() {
                    tree.reroot(child);
                }
            }
            None => self.tree = None,
        }
        Ok(())
    }

    fn on_next_move(&mut self, deadline: Instant) -> Result<u32, PlayerError> {
        if self.sm.is_terminal() {
            return Err(PlayerError::GameOver);
        }
        let legal = self.sm.legal_state(self.role)?;
        if legal.is_empty() {
            return Err(PlayerError::NoLegalMoves(self.role));
        }
        let first = legal.get(0);
        let count = legal.count();

        if self.config.skip_single_moves && count == 1 {
            self.last_search = Some(SearchStats {
                playouts: 0,
                nodes: self.tree.as_ref().map_or(0, MctsTree::len),
                elapsed: Duration::ZERO,
                memory: self.tree.as_ref().map_or(0, MctsTree::memory),
                stop: StopReason::SingleMove,
            });
            return Ok(first);
        }

        let stats = self.search(deadline)?;
        let choice = self.best_choice().unwrap_or(first);
        debug!(
            role = self.role,
            choice,
            playouts = stats.playouts,
            nodes = stats.nodes,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            stop = %stats.stop,
            "MCTS chose move"
        );
        self.last_search = Some(stats);
        Ok(choice)
    }
}
