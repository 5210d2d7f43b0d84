//! The evaluator contract shared by single and composite state machines.
//!
//! Players and the rollout benchmark are written against this trait so they
//! run unchanged over a plain [`StateMachine`] or a
//! [`CombinedStateMachine`](crate::combined::CombinedStateMachine).

use std::sync::Arc;

use crate::component::ComponentId;
use crate::error::StateMachineError;
use crate::legal::{JointMove, LegalState};
use crate::network::Network;
use crate::position::Position;
use crate::role::Role;
use crate::state_machine::StateMachine;

pub trait StateMachineInterface: Send {
    /// Network driving transitions, legality and termination.
    fn network(&self) -> &Arc<Network>;

    fn roles(&self) -> &[Role] {
        self.network().roles()
    }

    fn role_count(&self) -> usize {
        self.network().role_count()
    }

    fn num_bases(&self) -> usize {
        self.network().num_bases()
    }

    fn new_base_state(&self) -> Position {
        Position::new(self.num_bases())
    }

    fn joint_move(&self) -> JointMove {
        JointMove::new(self.role_count())
    }

    fn initial_state(&self) -> &Position;

    fn set_initial_state(&mut self, position: &Position) -> Result<(), StateMachineError>;

    fn reset(&mut self);

    fn update_bases(&mut self, position: &Position) -> Result<(), StateMachineError>;

    fn current(&self) -> &Position;

    fn current_state(&self, out: &mut Position) -> Result<(), StateMachineError>;

    fn legal_state(&mut self, role: usize) -> Result<&LegalState, StateMachineError>;

    fn legal_to_move(&self, role: usize, choice: usize) -> Result<&str, StateMachineError>;

    fn is_terminal(&self) -> bool;

    /// Score of `role` in the current terminal position.
    ///
    /// Takes `&mut self` because composite evaluators synchronise their
    /// scoring networks on demand.
    fn goal_value(&mut self, role: usize) -> Result<i32, StateMachineError>;

    fn component_value(&self, id: ComponentId) -> Result<bool, StateMachineError>;

    fn next_state(
        &mut self,
        joint: &JointMove,
        out: &mut Position,
    ) -> Result<(), StateMachineError>;

    /// Independent evaluator over the same shared network(s).
    fn dupe(&self) -> Self
    where
        Self: Sized;
}

impl StateMachineInterface for StateMachine {
    fn network(&self) -> &Arc<Network> {
        StateMachine::network(self)
    }

    fn initial_state(&self) -> &Position {
        StateMachine::initial_state(self)
    }

    fn set_initial_state(&mut self, position: &Position) -> Result<(), StateMachineError> {
        StateMachine::set_initial_state(self, position)
    }

    fn reset(&mut self) {
        StateMachine::reset(self)
    }

    fn update_bases(&mut self, position: &Position) -> Result<(), StateMachineError> {
        StateMachine::update_bases(self, position)
    }

    fn current(&self) -> &Position {
        StateMachine::current(self)
    }

    fn current_state(&self, out: &mut Position) -> Result<(), StateMachineError> {
        StateMachine::current_state(self, out)
    }

    fn legal_state(&mut self, role: usize) -> Result<&LegalState, StateMachineError> {
        StateMachine::legal_state(self, role)
    }

    fn legal_to_move(&self, role: usize, choice: usize) -> Result<&str, StateMachineError> {
        StateMachine::legal_to_move(self, role, choice)
    }

    fn is_terminal(&self) -> bool {
        StateMachine::is_terminal(self)
    }

    fn goal_value(&mut self, role: usize) -> Result<i32, StateMachineError> {
        StateMachine::goal_value(self, role)
    }

    fn component_value(&self, id: ComponentId) -> Result<bool, StateMachineError> {
        StateMachine::component_value(self, id)
    }

    fn next_state(
        &mut self,
        joint: &JointMove,
        out: &mut Position,
    ) -> Result<(), StateMachineError> {
        StateMachine::next_state(self, joint, out)
    }

    fn dupe(&self) -> Self {
        StateMachine::dupe(self)
    }
}
