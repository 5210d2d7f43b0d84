//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_game() -> String {
    defaults::game().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_skip_single_moves() -> bool {
    defaults::skip_single_moves()
}
fn d_max_tree_search_time() -> f64 {
    defaults::max_tree_search_time()
}
fn d_max_memory() -> usize {
    defaults::max_memory()
}
fn d_max_playouts() -> u64 {
    defaults::max_tree_playout_iterations()
}
fn d_max_nodes() -> usize {
    defaults::max_number_of_nodes()
}
fn d_ucb_constant() -> f64 {
    defaults::ucb_constant()
}
fn d_select_random() -> u32 {
    defaults::select_random_move_count()
}
fn d_dump_depth() -> u32 {
    defaults::dump_depth()
}
fn d_next_time() -> f64 {
    defaults::next_time()
}
fn d_max_playout_depth() -> u32 {
    defaults::max_playout_depth()
}
fn d_rollout_seconds() -> f64 {
    defaults::rollout_seconds()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub rollouts: RolloutConfig,
}

/// Settings shared by every command
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Registered network name
    #[serde(default = "d_game")]
    pub game: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            game: defaults::game().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Tree-search player configuration.
///
/// Durations are in seconds here; the player converts them.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_skip_single_moves")]
    pub skip_single_moves: bool,
    #[serde(default = "d_max_tree_search_time")]
    pub max_tree_search_time: f64,
    #[serde(default = "d_max_memory")]
    pub max_memory: usize,
    #[serde(default = "d_max_playouts")]
    pub max_tree_playout_iterations: u64,
    #[serde(default = "d_max_nodes")]
    pub max_number_of_nodes: usize,
    #[serde(default = "d_ucb_constant")]
    pub ucb_constant: f64,
    #[serde(default = "d_select_random")]
    pub select_random_move_count: u32,
    #[serde(default = "d_dump_depth")]
    pub dump_depth: u32,
    #[serde(default = "d_next_time")]
    pub next_time: f64,
    #[serde(default = "d_max_playout_depth")]
    pub max_playout_depth: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            skip_single_moves: defaults::skip_single_moves(),
            max_tree_search_time: defaults::max_tree_search_time(),
            max_memory: defaults::max_memory(),
            max_tree_playout_iterations: defaults::max_tree_playout_iterations(),
            max_number_of_nodes: defaults::max_number_of_nodes(),
            ucb_constant: defaults::ucb_constant(),
            select_random_move_count: defaults::select_random_move_count(),
            dump_depth: defaults::dump_depth(),
            next_time: defaults::next_time(),
            max_playout_depth: defaults::max_playout_depth(),
        }
    }
}

/// Depth-charge benchmark configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RolloutConfig {
    #[serde(default = "d_rollout_seconds")]
    pub seconds: f64,
    /// Fixed RNG seed (None = seeded from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            seconds: defaults::rollout_seconds(),
            seed: None,
        }
    }
}
