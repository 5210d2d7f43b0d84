//! Player contract and the two fixed-rule players.
//!
//! A player owns its own evaluator and follows the match: the host calls
//! [`Player::on_apply_move`] with every joint move actually played, and
//! [`Player::on_next_move`] whenever this player's role must choose.

use std::time::Instant;

use propnet_core::{JointMove, Position, StateMachineError, StateMachineInterface};
use thiserror::Error;
use tracing::debug;

use crate::playout::{FirstLegalPolicy, PlayoutPolicy, RandomPolicy};

/// Errors raised by players.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    #[error("Role {0} has no legal moves")]
    NoLegalMoves(usize),

    #[error("Game is already over")]
    GameOver,
}

/// A game-playing agent for one role.
pub trait Player {
    /// Human-readable player kind.
    fn name(&self) -> &str;

    /// Role index this player chooses for.
    fn role(&self) -> usize;

    /// Called once before the first move; may think until `deadline`.
    fn on_meta_gaming(&mut self, _deadline: Instant) -> Result<(), PlayerError> {
        Ok(())
    }

    /// Advance to the position after `joint`.
    fn on_apply_move(&mut self, joint: &JointMove) -> Result<(), PlayerError>;

    /// Choose a legal move for [`role`](Player::role) before `deadline`.
    fn on_next_move(&mut self, deadline: Instant) -> Result<u32, PlayerError>;
}

/// Player that applies a [`PlayoutPolicy`] to the real game.
#[derive(Debug, Clone)]
pub struct PolicyPlayer<S, P> {
    name: &'static str,
    sm: S,
    role: usize,
    policy: P,
    next: Position,
}

/// Uniformly random legal moves.
pub type RandomPlayer<S> = PolicyPlayer<S, RandomPolicy>;

/// Always the first legal move.
pub type LegalPlayer<S> = PolicyPlayer<S, FirstLegalPolicy>;

impl<S: StateMachineInterface> PolicyPlayer<S, RandomPolicy> {
    pub fn random(sm: S, role: usize) -> Self {
        Self::with_policy("random", sm, role, RandomPolicy::new())
    }

    /// Random player with a reproducible move sequence.
    pub fn random_seeded(sm: S, role: usize, seed: u64) -> Self {
        Self::with_policy("random", sm, role, RandomPolicy::with_seed(seed))
    }
}

impl<S: StateMachineInterface> PolicyPlayer<S, FirstLegalPolicy> {
    pub fn legal(sm: S, role: usize) -> Self {
        Self::with_policy("legal", sm, role, FirstLegalPolicy)
    }
}

impl<S: StateMachineInterface, P: PlayoutPolicy> PolicyPlayer<S, P> {
    pub fn with_policy(name: &'static str, mut sm: S, role: usize, policy: P) -> Self {
        sm.reset();
        Self {
            name,
            next: sm.new_base_state(),
            sm,
            role,
            policy,
        }
    }

    pub fn state_machine(&self) -> &S {
        &self.sm
    }
}

impl<S: StateMachineInterface, P: PlayoutPolicy> Player for PolicyPlayer<S, P> {
    fn name(&self) -> &str {
        self.name
    }

    fn role(&self) -> usize {
        self.role
    }

    fn on_apply_move(&mut self, joint: &JointMove) -> Result<(), PlayerError> {
        self.sm.next_state(joint, &mut self.next)?;
        Ok(())
    }

    fn on_next_move(&mut self, _deadline: Instant) -> Result<u32, PlayerError> {
        if self.sm.is_terminal() {
            return Err(PlayerError::GameOver);
        }
        let legal = self.sm.legal_state(self.role)?;
        if legal.is_empty() {
            return Err(PlayerError::NoLegalMoves(self.role));
        }
        let choice = self.policy.choose(legal);
        debug!(player = self.name, role = self.role, choice, "Chose move");
        Ok(choice)
    }
}
