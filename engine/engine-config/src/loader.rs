//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by PROPNET_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("PROPNET_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from PROPNET_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "PROPNET_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file falls back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (bool, u32, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = Some(v),
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: PROPNET_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.game, "PROPNET_COMMON_GAME");
    env_override!(config, common.log_level, "PROPNET_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.skip_single_moves,
        "PROPNET_MCTS_SKIP_SINGLE_MOVES",
        parse
    );
    env_override!(
        config,
        mcts.max_tree_search_time,
        "PROPNET_MCTS_MAX_TREE_SEARCH_TIME",
        parse
    );
    env_override!(config, mcts.max_memory, "PROPNET_MCTS_MAX_MEMORY", parse);
    env_override!(
        config,
        mcts.max_tree_playout_iterations,
        "PROPNET_MCTS_MAX_TREE_PLAYOUT_ITERATIONS",
        parse
    );
    env_override!(
        config,
        mcts.max_number_of_nodes,
        "PROPNET_MCTS_MAX_NUMBER_OF_NODES",
        parse
    );
    env_override!(
        config,
        mcts.ucb_constant,
        "PROPNET_MCTS_UCB_CONSTANT",
        parse
    );
    env_override!(
        config,
        mcts.select_random_move_count,
        "PROPNET_MCTS_SELECT_RANDOM_MOVE_COUNT",
        parse
    );
    env_override!(config, mcts.dump_depth, "PROPNET_MCTS_DUMP_DEPTH", parse);
    env_override!(config, mcts.next_time, "PROPNET_MCTS_NEXT_TIME", parse);
    env_override!(
        config,
        mcts.max_playout_depth,
        "PROPNET_MCTS_MAX_PLAYOUT_DEPTH",
        parse
    );

    // Rollouts
    env_override!(
        config,
        rollouts.seconds,
        "PROPNET_ROLLOUTS_SECONDS",
        parse
    );
    env_override!(
        config,
        rollouts.seed,
        "PROPNET_ROLLOUTS_SEED",
        optional_parse
    );

    config
}
