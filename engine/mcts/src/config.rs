//! MCTS player configuration parameters.

use std::time::Duration;

/// Configuration for the tree-search player.
///
/// Every budget is a soft limit checked once per search iteration; the
/// first one reached ends the search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Return immediately, without searching, when only one move is legal.
    pub skip_single_moves: bool,

    /// Wall-clock cap on a single search, independent of the move deadline.
    pub max_tree_search_time: Duration,

    /// Approximate cap on tree memory, in bytes.
    pub max_memory: usize,

    /// Maximum number of playouts per search.
    pub max_tree_playout_iterations: u64,

    /// Maximum number of nodes kept in the tree.
    pub max_number_of_nodes: usize,

    /// Exploration constant `c` in `mean + c * sqrt(ln N / n)`.
    /// Scores are normalised to [0, 1], so ~1.4 is the textbook value.
    pub ucb_constant: f64,

    /// Playout moves chosen uniformly at random before switching to the
    /// first legal move. 0 keeps playouts fully random.
    pub select_random_move_count: u32,

    /// Levels of the tree logged after each search (0 = none).
    pub dump_depth: u32,

    /// Interval between progress log lines during a search.
    pub next_time: Duration,

    /// Playouts longer than this are cut off and scored as neutral.
    pub max_playout_depth: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            skip_single_moves: true,
            max_tree_search_time: Duration::from_secs(10),
            max_memory: 1 << 30,
            max_tree_playout_iterations: 1_000_000,
            max_number_of_nodes: 1_000_000,
            ucb_constant: 1.414,
            select_random_move_count: 16,
            dump_depth: 0,
            next_time: Duration::from_millis(2500),
            max_playout_depth: 1000,
        }
    }
}

impl MctsConfig {
    /// Create a small, fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            skip_single_moves: true,
            max_tree_search_time: Duration::from_secs(5),
            max_memory: 64 << 20,
            max_tree_playout_iterations: 200,
            max_number_of_nodes: 10_000,
            ucb_constant: 1.414,
            select_random_move_count: 0,
            dump_depth: 0,
            next_time: Duration::from_secs(60),
            max_playout_depth: 500,
        }
    }

    /// Builder pattern: set the playout budget.
    pub fn with_playouts(mut self, n: u64) -> Self {
        self.max_tree_playout_iterations = n;
        self
    }

    /// Builder pattern: set the node budget.
    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_number_of_nodes = n;
        self
    }

    /// Builder pattern: set the memory budget in bytes.
    pub fn with_max_memory(mut self, bytes: usize) -> Self {
        self.max_memory = bytes;
        self
    }

    /// Builder pattern: set the per-search time cap.
    pub fn with_search_time(mut self, time: Duration) -> Self {
        self.max_tree_search_time = time;
        self
    }

    /// Builder pattern: set the UCB exploration constant.
    pub fn with_ucb_constant(mut self, c: f64) -> Self {
        self.ucb_constant = c;
        self
    }

    pub fn with_skip_single_moves(mut self, skip: bool) -> Self {
        self.skip_single_moves = skip;
        self
    }

    pub fn with_select_random_move_count(mut self, count: u32) -> Self {
        self.select_random_move_count = count;
        self
    }

    pub fn with_dump_depth(mut self, depth: u32) -> Self {
        self.dump_depth = depth;
        self
    }
}

impl From<&engine_config::MctsConfig> for MctsConfig {
    fn from(config: &engine_config::MctsConfig) -> Self {
        Self {
            skip_single_moves: config.skip_single_moves,
            max_tree_search_time: Duration::from_secs_f64(config.max_tree_search_time.max(0.0)),
            max_memory: config.max_memory,
            max_tree_playout_iterations: config.max_tree_playout_iterations,
            max_number_of_nodes: config.max_number_of_nodes,
            ucb_constant: config.ucb_constant,
            select_random_move_count: config.select_random_move_count,
            dump_depth: config.dump_depth,
            next_time: Duration::from_secs_f64(config.next_time.max(0.0)),
            max_playout_depth: config.max_playout_depth,
        }
    }
}
