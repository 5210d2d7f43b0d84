//! Playout policies: how moves are picked outside the tree.
//!
//! The tree-search player simulates with [`RandomPolicy`] and switches to
//! the cheaper [`FirstLegalPolicy`] deep into a playout. The simple players
//! are the same policies applied to the real game.

use propnet_core::LegalState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Picks one choice from a non-empty legal set.
pub trait PlayoutPolicy: Send {
    /// Returns a member of `legal`. Callers guarantee `legal` is non-empty.
    fn choose(&mut self, legal: &LegalState) -> u32;
}

/// Uniform choice among legal moves.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayoutPolicy for RandomPolicy {
    #[inline]
    fn choose(&mut self, legal: &LegalState) -> u32 {
        legal.get(self.rng.gen_range(0..legal.count()))
    }
}

/// Always the lowest legal choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalPolicy;

impl PlayoutPolicy for FirstLegalPolicy {
    #[inline]
    fn choose(&mut self, legal: &LegalState) -> u32 {
        legal.get(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propnet_core::StateMachine;
    use std::sync::Arc;

    fn opening_legals() -> LegalState {
        let network = propnet_games::tictactoe::network().unwrap();
        let mut sm = StateMachine::new(Arc::new(network));
        sm.legal_state(0).unwrap().clone()
    }

    #[test]
    fn test_random_policy_stays_legal() {
        let legal = opening_legals();
        let mut policy = RandomPolicy::with_seed(42);
        let mut seen = [false; 9];
        for _ in 0..500 {
            let choice = policy.choose(&legal);
            assert!(legal.contains(choice));
            seen[choice as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_random_policy_seeded() {
        let legal = opening_legals();
        let mut a = RandomPolicy::with_seed(1);
        let mut b = RandomPolicy::with_seed(1);
        for _ in 0..50 {
            assert_eq!(a.choose(&legal), b.choose(&legal));
        }
    }

    #[test]
    fn test_first_legal_policy() {
        let legal = opening_legals();
        assert_eq!(FirstLegalPolicy.choose(&legal), 0);
    }
}
