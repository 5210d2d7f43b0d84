//! Fixture games compiled into propagation networks
//!
//! Each game is written against the gate-level [`Circuit`] builder and
//! exposed three ways: `circuit()` for custom compilation (e.g. goal
//! splitting), `network()` for a compiled network, and through the
//! propnet-core registry by name.
//!
//! # Usage
//!
//! ```rust
//! use propnet_games::register_all_games;
//!
//! // Call once at startup - safe to call multiple times
//! register_all_games();
//! assert!(propnet_core::is_registered("tictactoe"));
//! ```
//!
//! [`Circuit`]: propnet_core::Circuit

use std::sync::Once;

use propnet_core::register_network;
use tracing::debug;

pub mod rock_paper_scissors;
pub mod subtraction;
pub mod tictactoe;
pub mod trivial;

#[cfg(test)]
mod tests;

static INIT: Once = Once::new();

/// Register every fixture game with the propnet-core registry.
///
/// Safe to call repeatedly and from multiple threads.
///
/// Currently registers:
/// - Tic-tac-toe (`"tictactoe"`)
/// - Trivial one-move game (`"trivial"`)
/// - Rock-paper-scissors (`"rock_paper_scissors"`)
/// - Subtraction game (`"subtraction"`)
pub fn register_all_games() {
    INIT.call_once(|| {
        register_network(tictactoe::NAME, tictactoe::network);
        register_network(trivial::NAME, trivial::network);
        register_network(rock_paper_scissors::NAME, rock_paper_scissors::network);
        register_network(subtraction::NAME, subtraction::network);
        debug!("Registered fixture games");
    });
}
