//! Composite evaluator: one primary network plus auxiliary scoring networks.
//!
//! Large games are often compiled in pieces: a goal-less network for
//! transitions, legality and termination, a separate network for goals, and
//! optionally per-role scoring networks switched on by a control proposition
//! of the primary. [`CombinedStateMachine`] presents them as one evaluator.
//!
//! Everything except [`goal_value`](CombinedStateMachine::goal_value) goes to
//! the primary. Auxiliary evaluators only follow the primary's position when
//! a goal is actually read.

use std::sync::Arc;

use tracing::trace;

use crate::component::ComponentId;
use crate::error::StateMachineError;
use crate::interface::StateMachineInterface;
use crate::legal::{JointMove, LegalState};
use crate::network::Network;
use crate::position::Position;
use crate::state_machine::StateMachine;

#[derive(Debug, Clone)]
struct ControlMachine {
    control_index: usize,
    /// Primary component gating this scorer; `None` means always active.
    control_cid: Option<ComponentId>,
    sm: StateMachine,
}

#[derive(Debug, Clone)]
pub struct CombinedStateMachine {
    primary: StateMachine,
    goal: Option<StateMachine>,
    controls: Vec<ControlMachine>,
}

impl CombinedStateMachine {
    pub fn new(primary: StateMachine) -> Self {
        Self {
            primary,
            goal: None,
            controls: Vec::new(),
        }
    }

    /// Goal-split pair: `primary` without goals, `goal_sm` scoring only.
    pub fn goalless(
        primary: StateMachine,
        goal_sm: StateMachine,
    ) -> Result<Self, StateMachineError> {
        let mut combined = Self::new(primary);
        combined.set_goal_state_machine(goal_sm)?;
        Ok(combined)
    }

    pub fn primary(&self) -> &StateMachine {
        &self.primary
    }

    pub fn set_goal_state_machine(&mut self, sm: StateMachine) -> Result<(), StateMachineError> {
        self.check_compatible(&sm)?;
        self.goal = Some(sm);
        Ok(())
    }

    /// Score role `control_index` with `sm` whenever `control_cid` holds in
    /// the primary.
    pub fn set_control_state_machine(
        &mut self,
        control_index: usize,
        control_cid: Option<ComponentId>,
        sm: StateMachine,
    ) -> Result<(), StateMachineError> {
        self.check_compatible(&sm)?;
        if control_index >= self.primary.role_count() {
            return Err(StateMachineError::RoleOutOfRange {
                role: control_index,
                count: self.primary.role_count(),
            });
        }
        if let Some(id) = control_cid {
            self.primary.component_value(id)?;
        }
        self.controls.push(ControlMachine {
            control_index,
            control_cid,
            sm,
        });
        Ok(())
    }

    fn check_compatible(&self, sm: &StateMachine) -> Result<(), StateMachineError> {
        if sm.num_bases() != self.primary.num_bases() {
            return Err(StateMachineError::IncompatibleNetwork {
                what: "bases",
                expected: self.primary.num_bases(),
                actual: sm.num_bases(),
            });
        }
        if sm.role_count() != self.primary.role_count() {
            return Err(StateMachineError::IncompatibleNetwork {
                what: "roles",
                expected: self.primary.role_count(),
                actual: sm.role_count(),
            });
        }
        Ok(())
    }

    /// Index into `controls` of the active scorer for `role`, if any.
    fn active_control(&self, role: usize) -> Option<usize> {
        self.controls.iter().position(|control| {
            control.control_index == role
                && control
                    .control_cid
                    .map_or(true, |id| self.primary.component_value(id).unwrap_or(false))
        })
    }

    pub fn goal_value(&mut self, role: usize) -> Result<i32, StateMachineError> {
        if role >= self.primary.role_count() {
            return Err(StateMachineError::RoleOutOfRange {
                role,
                count: self.primary.role_count(),
            });
        }
        if !self.primary.is_terminal() {
            return Err(StateMachineError::NotTerminal);
        }

        let current = self.primary.current();
        let scorer = match self.active_control(role) {
            Some(index) => {
                trace!(role, control = index, "goal routed to control network");
                &mut self.controls[index].sm
            }
            None => match self.goal.as_mut() {
                Some(goal) => goal,
                None => return self.primary.goal_value(role),
            },
        };
        scorer.update_bases(current)?;
        scorer.current_goal(role)
    }
}

impl StateMachineInterface for CombinedStateMachine {
    fn network(&self) -> &Arc<Network> {
        self.primary.network()
    }

    fn initial_state(&self) -> &Position {
        self.primary.initial_state()
    }

    fn set_initial_state(&mut self, position: &Position) -> Result<(), StateMachineError> {
        self.primary.set_initial_state(position)
    }

    fn reset(&mut self) {
        self.primary.reset()
    }

    fn update_bases(&mut self, position: &Position) -> Result<(), StateMachineError> {
        self.primary.update_bases(position)
    }

    fn current(&self) -> &Position {
        self.primary.current()
    }

    fn current_state(&self, out: &mut Position) -> Result<(), StateMachineError> {
        self.primary.current_state(out)
    }

    fn legal_state(&mut self, role: usize) -> Result<&LegalState, StateMachineError> {
        self.primary.legal_state(role)
    }

    fn legal_to_move(&self, role: usize, choice: usize) -> Result<&str, StateMachineError> {
        self.primary.legal_to_move(role, choice)
    }

    fn is_terminal(&self) -> bool {
        self.primary.is_terminal()
    }

    fn goal_value(&mut self, role: usize) -> Result<i32, StateMachineError> {
        CombinedStateMachine::goal_value(self, role)
    }

    fn component_value(&self, id: ComponentId) -> Result<bool, StateMachineError> {
        self.primary.component_value(id)
    }

    fn next_state(
        &mut self,
        joint: &JointMove,
        out: &mut Position,
    ) -> Result<(), StateMachineError> {
        self.primary.next_state(joint, out)
    }

    fn dupe(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    /// Two bases: `done` ends the game, `bonus` is set by choosing "bonus".
    fn circuit() -> Circuit {
        let mut c = Circuit::new();
        let solo = c.role("solo");
        let done = c.base("(done)");
        let bonus = c.base("(bonus)");
        let not_done = c.not(done);
        let plain = c.action(solo, "plain", not_done);
        let extra = c.action(solo, "bonus", not_done);
        let finished = c.or(&[plain, extra]);
        c.next(done, finished);
        c.next(bonus, extra);
        c.goal(solo, 100, done);
        c.goal(solo, 0, not_done);
        c.terminal(done);
        c
    }

    /// Scorer over the same bases that always reports `value`.
    fn constant_scorer(value: i32) -> StateMachine {
        let mut c = Circuit::new();
        let solo = c.role("solo");
        c.base("(done)");
        c.base("(bonus)");
        let always = c.constant(true);
        c.goal(solo, value, always);
        c.terminal(always);
        StateMachine::new(Arc::new(c.compile().unwrap()))
    }

    fn finish<S: StateMachineInterface>(sm: &mut S, choice: u32) {
        let mut out = sm.new_base_state();
        sm.next_state(&JointMove::from_choices(vec![choice]), &mut out)
            .unwrap();
    }

    #[test]
    fn test_goalless_matches_single_network() {
        let c = circuit();
        let (transitions, goals) = c.compile_split().unwrap();
        let mut combined = CombinedStateMachine::goalless(
            StateMachine::new(Arc::new(transitions)),
            StateMachine::new(Arc::new(goals)),
        )
        .unwrap();
        let mut single = StateMachine::new(Arc::new(c.compile().unwrap()));

        assert_eq!(combined.goal_value(0), Err(StateMachineError::NotTerminal));
        finish(&mut combined, 0);
        finish(&mut single, 0);
        assert!(combined.is_terminal());
        assert_eq!(combined.goal_value(0).unwrap(), single.goal_value(0).unwrap());
        assert_eq!(combined.goal.as_ref().unwrap().current(), combined.current());
    }

    #[test]
    fn test_control_routing_precedence() {
        let primary = StateMachine::new(Arc::new(circuit().compile().unwrap()));
        // Base ids equal fact indices; (bonus) is fact 1.
        let bonus_cid = Some(1);

        let mut combined = CombinedStateMachine::new(primary);
        combined.set_goal_state_machine(constant_scorer(50)).unwrap();
        combined
            .set_control_state_machine(0, bonus_cid, constant_scorer(75))
            .unwrap();

        let mut plain = combined.dupe();
        finish(&mut plain, 0);
        assert_eq!(plain.goal_value(0).unwrap(), 50);

        finish(&mut combined, 1);
        assert_eq!(combined.goal_value(0).unwrap(), 75);
    }

    #[test]
    fn test_unconditional_control() {
        let c = circuit();
        let network = Arc::new(c.compile().unwrap());
        let mut combined = CombinedStateMachine::new(StateMachine::new(network));
        combined
            .set_control_state_machine(0, None, constant_scorer(10))
            .unwrap();
        finish(&mut combined, 0);
        assert_eq!(combined.goal_value(0).unwrap(), 10);
    }

    #[test]
    fn test_primary_fallback() {
        let c = circuit();
        let network = Arc::new(c.compile().unwrap());
        let mut combined = CombinedStateMachine::new(StateMachine::new(network));
        finish(&mut combined, 0);
        assert_eq!(combined.goal_value(0).unwrap(), 100);
    }

    #[test]
    fn test_incompatible_scorer_rejected() {
        let c = circuit();
        let network = Arc::new(c.compile().unwrap());
        let mut combined = CombinedStateMachine::new(StateMachine::new(network));

        let mut small = Circuit::new();
        let solo = small.role("solo");
        let always = small.constant(true);
        small.goal(solo, 1, always);
        small.terminal(always);
        let scorer = StateMachine::new(Arc::new(small.compile().unwrap()));

        assert!(matches!(
            combined.set_goal_state_machine(scorer),
            Err(StateMachineError::IncompatibleNetwork { what: "bases", .. })
        ));
        assert!(combined
            .set_control_state_machine(3, None, constant_scorer(1))
            .is_err());
    }
}
