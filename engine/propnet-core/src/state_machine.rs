//! Incremental network evaluator.
//!
//! A [`StateMachine`] keeps one live counter and one output bit per
//! component. Changing a source (base or input) pushes a signed increment
//! into its fan-out; every component whose output flips pushes its own
//! increment further, FIFO, until the queue drains. Work per step is
//! proportional to what actually changed, never to the network size.
//!
//! The compiled [`Network`] is shared through an `Arc`; every evaluator owns
//! its transient state and is never shared between threads. Use
//! [`StateMachine::dupe`] to hand each worker its own evaluator.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::trace;

use crate::component::{ComponentId, ComponentTag};
use crate::error::StateMachineError;
use crate::legal::{JointMove, LegalState};
use crate::network::Network;
use crate::position::Position;
use crate::role::Role;

/// Counters, outputs and the propagation queue.
#[derive(Debug, Clone)]
struct Signals {
    counts: Vec<i32>,
    values: Vec<bool>,
    queue: VecDeque<(u32, i32)>,
    legal_dirty: Vec<bool>,
}

impl Signals {
    /// Settle every component once, in rank order, with all sources false.
    fn settle(network: &Network) -> Self {
        let count = network.num_components();
        let mut counts: Vec<i32> = network.components().iter().map(|c| c.initial_count).collect();
        let mut values = vec![false; count];

        for &id in network.settle_order() {
            let id = id as usize;
            let component = network.component(id);
            if component.tag.is_source() {
                continue;
            }
            let value = component.settled_value(counts[id]);
            values[id] = value;
            if value {
                for &to in network.fan_out(id) {
                    counts[to as usize] += component.incr;
                }
            }
        }

        Self {
            counts,
            values,
            queue: VecDeque::new(),
            legal_dirty: vec![true; network.role_count()],
        }
    }

    /// Force a source component to `value` and queue its fan-out.
    #[inline]
    fn set_source(&mut self, network: &Network, id: ComponentId, value: bool) {
        if self.values[id] == value {
            return;
        }
        self.values[id] = value;
        let incr = network.component(id).incr;
        let delta = if value { incr } else { -incr };
        self.queue.extend(network.fan_out(id).iter().map(|&to| (to, delta)));
    }

    /// Drain the queue.
    fn propagate(&mut self, network: &Network) {
        while let Some((id, delta)) = self.queue.pop_front() {
            let id = id as usize;
            let component = network.component(id);
            self.counts[id] += delta;

            let value = self.values[id];
            let next = component.next_value(value, self.counts[id]);
            if next == value {
                continue;
            }
            self.values[id] = next;
            if let ComponentTag::Legal { role } = component.tag {
                self.legal_dirty[role as usize] = true;
            }

            let delta = if next { component.incr } else { -component.incr };
            self.queue.extend(network.fan_out(id).iter().map(|&to| (to, delta)));
        }
    }

    /// Move the bases from `current` to `target`, touching only differing facts.
    fn sync_bases(&mut self, network: &Network, current: &mut Position, target: &Position) {
        for base in current.diff(target) {
            self.set_source(network, base, target.get(base));
        }
        current.assign(target);
        self.propagate(network);
    }
}

/// Evaluator for one compiled network.
#[derive(Debug, Clone)]
pub struct StateMachine {
    network: Arc<Network>,
    signals: Signals,
    current: Position,
    initial: Position,
    /// Input currently asserted per role, as a legal index.
    asserted: Vec<Option<u32>>,
    legals: Vec<LegalState>,
}

impl StateMachine {
    /// Build an evaluator positioned at the network's initial state.
    pub fn new(network: Arc<Network>) -> Self {
        let signals = Signals::settle(&network);
        let initial = network.initial_state().clone();
        let legals = network
            .roles()
            .iter()
            .map(|r| LegalState::with_capacity(r.num_inputs_legals))
            .collect();

        let mut sm = Self {
            current: Position::new(network.num_bases()),
            initial,
            asserted: vec![None; network.role_count()],
            legals,
            signals,
            network,
        };
        sm.reset();
        sm
    }

    /// Create an independent evaluator over the same network, at the same
    /// position and with the same initial state.
    pub fn dupe(&self) -> Self {
        self.clone()
    }

    #[inline]
    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    #[inline]
    pub fn roles(&self) -> &[Role] {
        self.network.roles()
    }

    #[inline]
    pub fn role_count(&self) -> usize {
        self.network.role_count()
    }

    #[inline]
    pub fn num_bases(&self) -> usize {
        self.network.num_bases()
    }

    /// All-false position sized for this network.
    pub fn new_base_state(&self) -> Position {
        Position::new(self.network.num_bases())
    }

    /// Joint move buffer sized for this network's roles.
    pub fn joint_move(&self) -> JointMove {
        JointMove::new(self.network.role_count())
    }

    #[inline]
    pub fn initial_state(&self) -> &Position {
        &self.initial
    }

    /// Replace the position [`reset`](Self::reset) returns to.
    pub fn set_initial_state(&mut self, position: &Position) -> Result<(), StateMachineError> {
        self.check_position(position)?;
        self.initial.assign(position);
        Ok(())
    }

    /// Retract every asserted input and return to the initial position.
    pub fn reset(&mut self) {
        let network = &*self.network;
        for (role, asserted) in network.roles().iter().zip(&mut self.asserted) {
            if let Some(choice) = asserted.take() {
                self.signals.set_source(network, role.input_start + choice as usize, false);
            }
        }
        self.signals.sync_bases(network, &mut self.current, &self.initial);
    }

    /// Move the evaluator to `position`.
    pub fn update_bases(&mut self, position: &Position) -> Result<(), StateMachineError> {
        self.check_position(position)?;
        self.signals.sync_bases(&self.network, &mut self.current, position);
        Ok(())
    }

    #[inline]
    pub fn current(&self) -> &Position {
        &self.current
    }

    /// Copy the current position into `out`.
    pub fn current_state(&self, out: &mut Position) -> Result<(), StateMachineError> {
        self.check_position(out)?;
        out.assign(&self.current);
        Ok(())
    }

    /// Legal choices of `role` in the current position, ascending.
    pub fn legal_state(&mut self, role: usize) -> Result<&LegalState, StateMachineError> {
        let range = self.role(role)?.legals();
        if self.signals.legal_dirty[role] {
            let legal = &mut self.legals[role];
            legal.clear();
            for (choice, id) in range.enumerate() {
                if self.signals.values[id] {
                    legal.push(choice as u32);
                }
            }
            self.signals.legal_dirty[role] = false;
        }
        Ok(&self.legals[role])
    }

    /// Display label of legal `choice` for `role`.
    pub fn legal_to_move(&self, role: usize, choice: usize) -> Result<&str, StateMachineError> {
        let id = self.legal_component(role, choice)?;
        Ok(self.network.meta(id).label())
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.signals.values[self.network.terminal_index()]
    }

    /// Score of `role` in the current terminal position.
    pub fn goal_value(&self, role: usize) -> Result<i32, StateMachineError> {
        self.role(role)?;
        if !self.is_terminal() {
            return Err(StateMachineError::NotTerminal);
        }
        self.current_goal(role)
    }

    /// Score of the first true goal of `role`, terminal or not.
    pub fn current_goal(&self, role: usize) -> Result<i32, StateMachineError> {
        self.role(role)?
            .goals()
            .find(|&id| self.signals.values[id])
            .and_then(|id| self.network.meta(id).goal_value)
            .ok_or(StateMachineError::NoGoal(role))
    }

    /// Output of any component, e.g. a control proposition.
    pub fn component_value(&self, id: ComponentId) -> Result<bool, StateMachineError> {
        self.signals
            .values
            .get(id)
            .copied()
            .ok_or(StateMachineError::ComponentOutOfRange {
                id,
                count: self.signals.values.len(),
            })
    }

    /// Apply `joint`, write the successor into `out` and move there.
    ///
    /// Every choice must be legal in the current position.
    pub fn next_state(
        &mut self,
        joint: &JointMove,
        out: &mut Position,
    ) -> Result<(), StateMachineError> {
        if joint.len() != self.role_count() {
            return Err(StateMachineError::JointMoveSize {
                expected: self.role_count(),
                actual: joint.len(),
            });
        }
        self.check_position(out)?;
        for (role, &choice) in joint.as_slice().iter().enumerate() {
            let id = self.legal_component(role, choice as usize)?;
            if !self.signals.values[id] {
                return Err(StateMachineError::IllegalChoice {
                    role,
                    choice: choice as usize,
                });
            }
        }

        let network = &*self.network;
        for ((role, &choice), asserted) in network
            .roles()
            .iter()
            .zip(joint.as_slice())
            .zip(&mut self.asserted)
        {
            if *asserted == Some(choice) {
                continue;
            }
            if let Some(previous) = asserted.replace(choice) {
                self.signals.set_source(network, role.input_start + previous as usize, false);
            }
            self.signals.set_source(network, role.input_start + choice as usize, true);
        }
        self.signals.propagate(network);

        out.clear();
        let num_bases = network.num_bases();
        for base in 0..network.shape().num_transitions {
            if self.signals.values[num_bases + base] {
                out.set(base, true);
            }
        }
        trace!(joint = ?joint.as_slice(), facts = out.count_ones(), "next_state");

        self.signals.sync_bases(network, &mut self.current, out);
        Ok(())
    }

    fn role(&self, role: usize) -> Result<&Role, StateMachineError> {
        self.network
            .roles()
            .get(role)
            .ok_or(StateMachineError::RoleOutOfRange {
                role,
                count: self.network.role_count(),
            })
    }

    fn legal_component(
        &self,
        role: usize,
        choice: usize,
    ) -> Result<ComponentId, StateMachineError> {
        let spec = self.role(role)?;
        if choice >= spec.num_inputs_legals {
            return Err(StateMachineError::ChoiceOutOfRange {
                role,
                choice,
                count: spec.num_inputs_legals,
            });
        }
        Ok(spec.legal_start + choice)
    }

    fn check_position(&self, position: &Position) -> Result<(), StateMachineError> {
        if position.len() != self.network.num_bases() {
            return Err(StateMachineError::PositionSize {
                expected: self.network.num_bases(),
                actual: position.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    /// Single role. "press" is legal until pressed, "wait" always.
    /// Pressing ends the game with 100; a second base counts waits.
    fn press_machine() -> StateMachine {
        let mut c = Circuit::new();
        let solo = c.role("solo");
        let done = c.base("(done)");
        let waited = c.base("(waited)");
        let not_done = c.not(done);
        let press = c.action(solo, "press", not_done);
        let always = c.constant(true);
        let wait = c.action(solo, "wait", always);
        c.next(done, press);
        c.next(waited, wait);
        c.goal(solo, 100, done);
        c.goal(solo, 0, not_done);
        c.terminal(done);
        StateMachine::new(Arc::new(c.compile().unwrap()))
    }

    fn play(sm: &mut StateMachine, choice: u32) -> Position {
        let mut out = sm.new_base_state();
        let joint = JointMove::from_choices(vec![choice]);
        sm.next_state(&joint, &mut out).unwrap();
        out
    }

    #[test]
    fn test_initial_legals() {
        let mut sm = press_machine();
        assert!(!sm.is_terminal());
        assert_eq!(sm.legal_state(0).unwrap().as_slice(), &[0, 1]);
        assert_eq!(sm.legal_to_move(0, 0).unwrap(), "press");
        assert_eq!(sm.legal_to_move(0, 1).unwrap(), "wait");
        assert_eq!(sm.goal_value(0).unwrap_err(), StateMachineError::NotTerminal);
        assert_eq!(sm.current_goal(0).unwrap(), 0);
    }

    #[test]
    fn test_next_state_moves_evaluator() {
        let mut sm = press_machine();
        let after_wait = play(&mut sm, 1);
        assert!(!after_wait.get(0));
        assert!(after_wait.get(1));
        assert_eq!(sm.current(), &after_wait);
        assert!(!sm.is_terminal());

        let after_press = play(&mut sm, 0);
        assert!(after_press.get(0));
        assert!(!after_press.get(1));
        assert!(sm.is_terminal());
        assert_eq!(sm.goal_value(0).unwrap(), 100);
        assert_eq!(sm.legal_state(0).unwrap().as_slice(), &[1]);
    }

    #[test]
    fn test_illegal_choice_rejected() {
        let mut sm = press_machine();
        play(&mut sm, 0);
        let before = sm.current().clone();
        let mut out = sm.new_base_state();
        assert_eq!(
            sm.next_state(&JointMove::from_choices(vec![0]), &mut out),
            Err(StateMachineError::IllegalChoice { role: 0, choice: 0 })
        );
        assert_eq!(sm.current(), &before);
    }

    #[test]
    fn test_usage_errors() {
        let mut sm = press_machine();
        let mut out = sm.new_base_state();
        assert!(matches!(
            sm.next_state(&JointMove::from_choices(vec![2]), &mut out),
            Err(StateMachineError::ChoiceOutOfRange { choice: 2, .. })
        ));
        assert!(matches!(
            sm.next_state(&JointMove::new(2), &mut out),
            Err(StateMachineError::JointMoveSize { expected: 1, actual: 2 })
        ));
        assert!(matches!(
            sm.update_bases(&Position::new(5)),
            Err(StateMachineError::PositionSize { expected: 2, actual: 5 })
        ));
        assert!(sm.legal_state(1).is_err());
        assert!(sm.legal_to_move(0, 9).is_err());
        assert!(sm.component_value(10_000).is_err());
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut sm = press_machine();
        play(&mut sm, 1);
        play(&mut sm, 0);
        sm.reset();
        assert_eq!(sm.current(), sm.initial_state());
        assert!(!sm.is_terminal());
        assert_eq!(sm.legal_state(0).unwrap().as_slice(), &[0, 1]);

        sm.reset();
        assert_eq!(sm.current(), sm.initial_state());
    }

    #[test]
    fn test_set_initial_state() {
        let mut sm = press_machine();
        let mut start = sm.new_base_state();
        start.set(0, true);
        sm.set_initial_state(&start).unwrap();
        sm.reset();
        assert!(sm.is_terminal());
        assert_eq!(sm.goal_value(0).unwrap(), 100);
    }

    #[test]
    fn test_update_bases_no_change_is_noop() {
        let mut sm = press_machine();
        let current = sm.current().clone();
        sm.update_bases(&current).unwrap();
        assert_eq!(sm.current(), &current);
        assert_eq!(sm.legal_state(0).unwrap().count(), 2);
    }

    #[test]
    fn test_dupe_is_independent() {
        let mut sm = press_machine();
        let mut copy = sm.dupe();
        play(&mut sm, 0);
        assert!(sm.is_terminal());
        assert!(!copy.is_terminal());
        assert_eq!(copy.legal_state(0).unwrap().count(), 2);
        assert!(Arc::ptr_eq(sm.network(), copy.network()));
    }

    #[test]
    fn test_current_state_copies() {
        let mut sm = press_machine();
        let expected = play(&mut sm, 1);
        let mut out = sm.new_base_state();
        sm.current_state(&mut out).unwrap();
        assert_eq!(out, expected);
    }
}
