//! Rollout benchmark: random play to terminal for a fixed wall-clock budget.
//!
//! Results are exposed as flat integer counters:
//!
//! | index                  | counter                                  |
//! |------------------------|------------------------------------------|
//! | 0                      | elapsed milliseconds                     |
//! | 1                      | completed rollouts                       |
//! | 2                      | state transitions                        |
//! | `3 + role * 101 + s`   | rollouts where `role` scored `s` (0-100) |

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::error::StateMachineError;
use crate::interface::StateMachineInterface;
use crate::legal::JointMove;
use crate::position::Position;

/// Number of distinct scores per role (0 through 100).
pub const SCORE_SLOTS: usize = 101;

const ELAPSED_MS: usize = 0;
const ROLLOUTS: usize = 1;
const TRANSITIONS: usize = 2;
const SCORES_START: usize = 3;

pub struct DepthChargeTest<S> {
    sm: S,
    rng: ChaCha20Rng,
    results: Vec<u64>,
    joint: JointMove,
    next: Position,
}

impl<S: StateMachineInterface> DepthChargeTest<S> {
    pub fn new(sm: S) -> Self {
        Self::with_rng(sm, ChaCha20Rng::from_entropy())
    }

    /// Reproducible benchmark.
    pub fn with_seed(sm: S, seed: u64) -> Self {
        Self::with_rng(sm, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(sm: S, rng: ChaCha20Rng) -> Self {
        let results = vec![0; SCORES_START + sm.role_count() * SCORE_SLOTS];
        Self {
            joint: sm.joint_move(),
            next: sm.new_base_state(),
            sm,
            rng,
            results,
        }
    }

    /// Play random games from the initial position until `duration` elapses.
    ///
    /// Counters are cleared first. At least one rollout always completes.
    pub fn do_rollouts(&mut self, duration: Duration) -> Result<(), StateMachineError> {
        self.results.iter_mut().for_each(|r| *r = 0);
        let start = Instant::now();
        let deadline = start + duration;

        loop {
            self.rollout()?;
            if Instant::now() >= deadline {
                break;
            }
        }

        self.results[ELAPSED_MS] = start.elapsed().as_millis() as u64;
        info!(
            rollouts = self.rollouts(),
            transitions = self.transitions(),
            elapsed_ms = self.results[ELAPSED_MS],
            per_second = self.rollouts_per_second(),
            "Rollouts complete"
        );
        Ok(())
    }

    fn rollout(&mut self) -> Result<(), StateMachineError> {
        self.sm.reset();
        let role_count = self.sm.role_count();

        while !self.sm.is_terminal() {
            for role in 0..role_count {
                let legal = self.sm.legal_state(role)?;
                if legal.is_empty() {
                    return Err(StateMachineError::NoLegalMoves(role));
                }
                let pick = legal.get(self.rng.gen_range(0..legal.count()));
                self.joint.set(role, pick);
            }
            self.sm.next_state(&self.joint, &mut self.next)?;
            self.results[TRANSITIONS] += 1;
        }

        for role in 0..role_count {
            let score = self.sm.goal_value(role)?.clamp(0, 100) as usize;
            self.results[SCORES_START + role * SCORE_SLOTS + score] += 1;
        }
        self.results[ROLLOUTS] += 1;
        debug!(rollout = self.results[ROLLOUTS], "Rollout finished");
        Ok(())
    }

    /// Raw counter at `index`, `None` past the end of the layout.
    pub fn result(&self, index: usize) -> Option<u64> {
        self.results.get(index).copied()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.results[ELAPSED_MS])
    }

    pub fn rollouts(&self) -> u64 {
        self.results[ROLLOUTS]
    }

    pub fn transitions(&self) -> u64 {
        self.results[TRANSITIONS]
    }

    /// Per-score rollout counts for `role`, indexed by score; `None` for an unknown role.
    pub fn score_counts(&self, role: usize) -> Option<&[u64]> {
        let start = SCORES_START + role * SCORE_SLOTS;
        self.results.get(start..start + SCORE_SLOTS)
    }

    pub fn rollouts_per_second(&self) -> f64 {
        let ms = self.results[ELAPSED_MS].max(1) as f64;
        self.rollouts() as f64 * 1000.0 / ms
    }

    pub fn state_machine(&self) -> &S {
        &self.sm
    }

    pub fn into_inner(self) -> S {
        self.sm
    }
}
