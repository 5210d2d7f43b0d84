//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time, so the binary and the
//! documented defaults cannot drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    rollouts: RolloutDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    game: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    skip_single_moves: bool,
    max_tree_search_time: f64,
    max_memory: usize,
    max_tree_playout_iterations: u64,
    max_number_of_nodes: usize,
    ucb_constant: f64,
    select_random_move_count: u32,
    dump_depth: u32,
    next_time: f64,
    max_playout_depth: u32,
}

#[derive(Debug, Deserialize)]
struct RolloutDefaults {
    seconds: f64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn game() -> &'static str {
    &DEFAULTS.common.game
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn skip_single_moves() -> bool {
    DEFAULTS.mcts.skip_single_moves
}
pub fn max_tree_search_time() -> f64 {
    DEFAULTS.mcts.max_tree_search_time
}
pub fn max_memory() -> usize {
    DEFAULTS.mcts.max_memory
}
pub fn max_tree_playout_iterations() -> u64 {
    DEFAULTS.mcts.max_tree_playout_iterations
}
pub fn max_number_of_nodes() -> usize {
    DEFAULTS.mcts.max_number_of_nodes
}
pub fn ucb_constant() -> f64 {
    DEFAULTS.mcts.ucb_constant
}
pub fn select_random_move_count() -> u32 {
    DEFAULTS.mcts.select_random_move_count
}
pub fn dump_depth() -> u32 {
    DEFAULTS.mcts.dump_depth
}
pub fn next_time() -> f64 {
    DEFAULTS.mcts.next_time
}
pub fn max_playout_depth() -> u32 {
    DEFAULTS.mcts.max_playout_depth
}

// Rollouts
pub fn rollout_seconds() -> f64 {
    DEFAULTS.rollouts.seconds
}
