//! Game-playing agents over propagation-network evaluators.
//!
//! Every agent implements [`Player`]: it owns its own evaluator, follows
//! the match through [`Player::on_apply_move`] and picks a legal move in
//! [`Player::on_next_move`] before a deadline.
//!
//! - [`RandomPlayer`]: uniform among the current legal moves
//! - [`LegalPlayer`]: always the first legal move
//! - [`MctsPlayer`]: Monte Carlo tree search with UCB1 selection and
//!   decoupled per-role statistics, so simultaneous-move games work too
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//! use mcts::{MctsConfig, MctsPlayer, Player};
//! use propnet_core::StateMachine;
//!
//! let network = Arc::new(propnet_games::subtraction::network().unwrap());
//! let config = MctsConfig::for_testing().with_playouts(500);
//! let mut player = MctsPlayer::with_seed(StateMachine::new(network), 0, config, 42);
//!
//! let choice = player.on_next_move(Instant::now() + Duration::from_secs(5)).unwrap();
//! println!("Chose {choice} after {} playouts", player.last_search().unwrap().playouts);
//! ```
//!
//! # Configuration
//!
//! [`MctsConfig`] holds the search budgets (time, nodes, memory, playouts),
//! the UCB exploration constant and playout shaping. Every budget is a soft
//! limit checked once per iteration; running out is a normal
//! [`StopReason`], not an error.

pub mod config;
pub mod node;
pub mod player;
pub mod playout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId, RoleStats};
pub use player::{LegalPlayer, Player, PlayerError, PolicyPlayer, RandomPlayer};
pub use playout::{FirstLegalPolicy, PlayoutPolicy, RandomPolicy};
pub use search::{MctsPlayer, SearchStats, StopReason};
pub use tree::{MctsTree, TreeStats};
