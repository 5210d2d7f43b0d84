//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the runner and the tree-search player.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`PROPNET_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! PROPNET_<SECTION>_<KEY>=value
//!
//! Examples:
//!     PROPNET_COMMON_GAME=subtraction
//!     PROPNET_COMMON_LOG_LEVEL=debug
//!     PROPNET_MCTS_UCB_CONSTANT=0.8
//!     PROPNET_MCTS_SKIP_SINGLE_MOVES=false
//!     PROPNET_ROLLOUTS_SEED=42
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
