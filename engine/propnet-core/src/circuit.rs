//! Gate-level circuit builder that compiles into the tabular handoff.
//!
//! `Circuit` is a small programmatic front end for producing networks
//! without a GDL compiler: declare roles, bases and actions, wire them
//! through AND/OR/NOT gates, then [`Circuit::compile`] lays out component
//! ids, ranks and thresholds and feeds the result through
//! [`NetworkBuilder`].
//!
//! ```rust
//! use propnet_core::circuit::Circuit;
//!
//! let mut c = Circuit::new();
//! let solo = c.role("solo");
//! let done = c.base("(done)");
//! let not_done = c.not(done);
//! let press = c.action(solo, "press", not_done);
//! c.next(done, press);
//! c.goal(solo, 100, done);
//! c.goal(solo, 0, not_done);
//! c.terminal(done);
//! let network = c.compile().unwrap();
//! assert_eq!(network.role_count(), 1);
//! ```

use crate::component::ComponentSpec;
use crate::error::NetworkError;
use crate::meta::MetaComponent;
use crate::network::{Network, NetworkBuilder, NetworkShape};
use crate::position::Position;
use crate::role::Role;

/// Handle to a signal (a node output) in a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal(usize);

#[derive(Debug, Clone)]
enum Node {
    Base(usize),
    Input { role: usize, action: usize },
    And(Vec<Signal>),
    Or(Vec<Signal>),
    Not(Signal),
}

#[derive(Debug, Clone)]
struct CircuitAction {
    move_text: String,
    legal: Signal,
}

#[derive(Debug, Clone)]
struct CircuitRole {
    name: String,
    actions: Vec<CircuitAction>,
    goals: Vec<(i32, Signal)>,
}

/// Which parts of the circuit a compilation emits.
#[derive(Debug, Clone, Copy)]
struct Parts {
    transitions: bool,
    actions: bool,
    goals: bool,
}

impl Parts {
    const ALL: Parts = Parts {
        transitions: true,
        actions: true,
        goals: true,
    };
}

#[derive(Debug, Clone, Default)]
pub struct Circuit {
    nodes: Vec<Node>,
    roles: Vec<CircuitRole>,
    base_names: Vec<String>,
    next: Vec<Option<Signal>>,
    initial: Vec<usize>,
    terminal: Option<Signal>,
    problems: Vec<String>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> Signal {
        self.nodes.push(node);
        Signal(self.nodes.len() - 1)
    }

    /// Declare a role, returning its index.
    pub fn role(&mut self, name: impl Into<String>) -> usize {
        self.roles.push(CircuitRole {
            name: name.into(),
            actions: Vec::new(),
            goals: Vec::new(),
        });
        self.roles.len() - 1
    }

    /// Declare a persistent fact.
    pub fn base(&mut self, gdl: impl Into<String>) -> Signal {
        self.base_names.push(gdl.into());
        self.next.push(None);
        let index = self.base_names.len() - 1;
        self.push(Node::Base(index))
    }

    /// Declare an action for `role`, legal whenever `legal` holds.
    ///
    /// Returns the input ("does") signal. Actions are numbered per role in
    /// declaration order; that number is the legal choice index.
    pub fn action(&mut self, role: usize, move_text: impl Into<String>, legal: Signal) -> Signal {
        let action = self.roles[role].actions.len();
        self.roles[role].actions.push(CircuitAction {
            move_text: move_text.into(),
            legal,
        });
        self.push(Node::Input { role, action })
    }

    pub fn and(&mut self, inputs: &[Signal]) -> Signal {
        self.push(Node::And(inputs.to_vec()))
    }

    pub fn or(&mut self, inputs: &[Signal]) -> Signal {
        self.push(Node::Or(inputs.to_vec()))
    }

    pub fn not(&mut self, input: Signal) -> Signal {
        self.push(Node::Not(input))
    }

    pub fn constant(&mut self, value: bool) -> Signal {
        if value {
            self.and(&[])
        } else {
            self.or(&[])
        }
    }

    /// `base` holds in the successor position iff `cond` holds now.
    pub fn next(&mut self, base: Signal, cond: Signal) {
        match self.nodes[base.0] {
            Node::Base(index) => self.next[index] = Some(cond),
            _ => self.problems.push(format!("next() target {} is not a base", base.0)),
        }
    }

    pub fn goal(&mut self, role: usize, value: i32, cond: Signal) {
        self.roles[role].goals.push((value, cond));
    }

    pub fn terminal(&mut self, cond: Signal) {
        self.terminal = Some(cond);
    }

    /// Mark `base` true in the initial position.
    pub fn init(&mut self, base: Signal) {
        match self.nodes[base.0] {
            Node::Base(index) => self.initial.push(index),
            _ => self.problems.push(format!("init() target {} is not a base", base.0)),
        }
    }

    pub fn num_bases(&self) -> usize {
        self.base_names.len()
    }

    /// Compile the whole circuit into one network.
    pub fn compile(&self) -> Result<Network, NetworkError> {
        self.compile_parts(Parts::ALL)
    }

    /// Compile into a goal-less transition network and a goal-only scoring
    /// network over the same bases.
    pub fn compile_split(&self) -> Result<(Network, Network), NetworkError> {
        let transitions = self.compile_parts(Parts {
            goals: false,
            ..Parts::ALL
        })?;
        let goals = self.compile_parts(Parts {
            transitions: false,
            actions: false,
            goals: true,
        })?;
        Ok((transitions, goals))
    }

    fn compile_parts(&self, parts: Parts) -> Result<Network, NetworkError> {
        if let Some(problem) = self.problems.first() {
            return Err(NetworkError::Circuit(problem.clone()));
        }

        let num_bases = self.base_names.len();
        let num_transitions = if parts.transitions { num_bases } else { 0 };
        let mut id = num_bases;

        // Sinks are pass-through components reading one signal each.
        let mut sinks: Vec<(usize, Option<Signal>, MetaComponent)> = Vec::new();
        for (base, name) in self.base_names.iter().enumerate().take(num_transitions) {
            let meta = MetaComponent::new("transition", format!("(next {name})"));
            sinks.push((id, self.next[base], meta));
            id += 1;
        }

        let mut sources: Vec<(usize, MetaComponent)> = Vec::new();
        let mut input_ids: Vec<Vec<usize>> = Vec::with_capacity(self.roles.len());
        for role in &self.roles {
            let count = if parts.actions { role.actions.len() } else { 0 };
            input_ids.push((id..id + count).collect());
            for action in &role.actions[..count] {
                let meta = MetaComponent::new(
                    "input",
                    format!("(does {} {})", role.name, action.move_text),
                )
                .with_move(action.move_text.clone());
                sources.push((id, meta));
                id += 1;
            }
        }

        let mut role_specs = Vec::with_capacity(self.roles.len());
        for (index, role) in self.roles.iter().enumerate() {
            let count = input_ids[index].len();
            let legal_start = id;
            for action in &role.actions[..count] {
                let meta = MetaComponent::new(
                    "legal",
                    format!("(legal {} {})", role.name, action.move_text),
                )
                .with_move(action.move_text.clone());
                sinks.push((id, Some(action.legal), meta));
                id += 1;
            }
            let goal_start = id;
            let num_goals = if parts.goals { role.goals.len() } else { 0 };
            for &(value, cond) in &role.goals[..num_goals] {
                let meta = MetaComponent::new("goal", format!("(goal {} {})", role.name, value))
                    .with_goal(value);
                sinks.push((id, Some(cond), meta));
                id += 1;
            }
            let input_start = input_ids[index].first().copied().unwrap_or(legal_start);
            role_specs.push(Role::new(
                role.name.clone(),
                input_start,
                legal_start,
                goal_start,
                count,
                num_goals,
            ));
        }

        let terminal_id = id;
        sinks.push((id, self.terminal, MetaComponent::new("terminal", "terminal")));
        id += 1;

        // Map every reachable node to a component id; gates go last.
        let reachable = self.reachable(sinks.iter().filter_map(|(_, s, _)| *s));
        let mut node_ids: Vec<Option<usize>> = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Base(base) => node_ids[index] = Some(*base),
                Node::Input { role, action } => match input_ids[*role].get(*action) {
                    Some(&cid) => node_ids[index] = Some(cid),
                    None if reachable[index] => {
                        return Err(NetworkError::Circuit(format!(
                            "role {} action {} is read but inputs are not compiled",
                            self.roles[*role].name, action
                        )));
                    }
                    None => {}
                },
                _ if reachable[index] => {
                    node_ids[index] = Some(id);
                    id += 1;
                }
                _ => {}
            }
        }
        let num_components = id;
        let lookup = |signal: Signal| {
            node_ids[signal.0]
                .ok_or_else(|| NetworkError::Circuit(format!("unmapped signal {}", signal.0)))
        };

        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); num_components];
        let mut kinds: Vec<Option<ComponentKind>> = vec![None; num_components];
        let mut meta: Vec<MetaComponent> = vec![MetaComponent::default(); num_components];

        for (base, name) in self.base_names.iter().enumerate() {
            kinds[base] = Some(ComponentKind::Or);
            meta[base] = MetaComponent::new("base", name.clone());
        }
        for (cid, m) in sources {
            kinds[cid] = Some(ComponentKind::Or);
            meta[cid] = m;
        }
        for (cid, signal, m) in sinks {
            if let Some(signal) = signal {
                incoming[cid].push(lookup(signal)?);
            }
            kinds[cid] = Some(ComponentKind::Or);
            meta[cid] = m;
        }
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(cid) = node_ids[index] else { continue };
            let (kind, inputs, label) = match node {
                Node::Base(_) | Node::Input { .. } => continue,
                Node::And(inputs) if inputs.is_empty() => (ComponentKind::And, &[][..], "constant"),
                Node::Or(inputs) if inputs.is_empty() => (ComponentKind::Or, &[][..], "constant"),
                Node::And(inputs) => (ComponentKind::And, inputs.as_slice(), "and"),
                Node::Or(inputs) => (ComponentKind::Or, inputs.as_slice(), "or"),
                Node::Not(input) => (ComponentKind::Not, std::slice::from_ref(input), "not"),
            };
            for &signal in inputs {
                incoming[cid].push(lookup(signal)?);
            }
            kinds[cid] = Some(kind);
            meta[cid] = MetaComponent::new(label, "");
        }

        // Ranks are longest paths from the sources (Kahn's algorithm).
        let mut fan_out: Vec<Vec<usize>> = vec![Vec::new(); num_components];
        for (to, froms) in incoming.iter().enumerate() {
            for &from in froms {
                fan_out[from].push(to);
            }
        }
        let mut ranks = vec![0usize; num_components];
        let mut pending: Vec<usize> = incoming.iter().map(Vec::len).collect();
        let mut ready: Vec<usize> = (0..num_components).filter(|&c| pending[c] == 0).collect();
        let mut visited = 0;
        while let Some(cid) = ready.pop() {
            visited += 1;
            for &to in &fan_out[cid] {
                ranks[to] = ranks[to].max(ranks[cid] + 1);
                pending[to] -= 1;
                if pending[to] == 0 {
                    ready.push(to);
                }
            }
        }
        if visited != num_components {
            return Err(NetworkError::Circuit("circuit contains a cycle".into()));
        }

        let mut builder = NetworkBuilder::new(NetworkShape {
            role_count: role_specs.len(),
            num_bases,
            num_transitions,
            num_components,
            num_outputs: fan_out.iter().map(Vec::len).sum(),
            topological_size: ranks.iter().max().map_or(1, |r| r + 1),
        });
        for (index, role) in role_specs.into_iter().enumerate() {
            builder.set_role(index, role)?;
        }
        let mut slot = 0;
        for cid in 0..num_components {
            let kind = kinds[cid]
                .ok_or_else(|| NetworkError::Circuit(format!("component {cid} left undefined")))?;
            let (arity, outputs, rank) = (incoming[cid].len(), fan_out[cid].len(), ranks[cid]);
            let spec = match kind {
                ComponentKind::Or => ComponentSpec::or(slot, outputs, rank),
                ComponentKind::And => ComponentSpec::and(arity, slot, outputs, rank),
                ComponentKind::Not => ComponentSpec::not(slot, outputs, rank),
            };
            builder.set_component(cid, spec)?;
            for &to in &fan_out[cid] {
                builder.set_output(slot, to)?;
                slot += 1;
            }
            builder.set_meta_component(cid, std::mem::take(&mut meta[cid]))?;
        }
        let initial = Position::from_indices(num_bases, self.initial.iter().copied());
        builder.set_initial_state(initial)?;
        builder.finalise(terminal_id)
    }

    fn reachable(&self, sinks: impl Iterator<Item = Signal>) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<usize> = sinks.map(|s| s.0).collect();
        while let Some(index) = stack.pop() {
            if index >= self.nodes.len() || seen[index] {
                continue;
            }
            seen[index] = true;
            match &self.nodes[index] {
                Node::And(inputs) | Node::Or(inputs) => stack.extend(inputs.iter().map(|s| s.0)),
                Node::Not(input) => stack.push(input.0),
                Node::Base(_) | Node::Input { .. } => {}
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Copy)]
enum ComponentKind {
    And,
    Or,
    Not,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentTag;

    /// Single role, one base, "press" legal until pressed.
    fn press_circuit() -> Circuit {
        let mut c = Circuit::new();
        let solo = c.role("solo");
        let done = c.base("(done)");
        let not_done = c.not(done);
        let press = c.action(solo, "press", not_done);
        let wait = c.constant(true);
        c.action(solo, "wait", wait);
        c.next(done, press);
        c.goal(solo, 100, done);
        c.goal(solo, 0, not_done);
        c.terminal(done);
        c
    }

    #[test]
    fn test_compile_layout() {
        let network = press_circuit().compile().unwrap();
        assert_eq!(network.num_bases(), 1);
        assert_eq!(network.transition_for(0), Some(1));
        assert_eq!(network.component(0).tag, ComponentTag::Base);
        assert_eq!(network.component(1).tag, ComponentTag::Transition);

        let role = &network.roles()[0];
        assert_eq!(role.inputs(), 2..4);
        assert_eq!(role.legals(), 4..6);
        assert_eq!(role.goals(), 6..8);
        assert_eq!(network.terminal_index(), 8);
        assert_eq!(network.meta(2).move_text.as_deref(), Some("press"));
        assert_eq!(network.meta(6).goal_value, Some(100));
        assert_eq!(network.meta(7).goal_value, Some(0));
    }

    #[test]
    fn test_ranks_increase_along_edges() {
        let network = press_circuit().compile().unwrap();
        for id in 0..network.num_components() {
            for &to in network.fan_out(id) {
                assert!(network.component(to as usize).rank > network.component(id).rank);
            }
        }
    }

    #[test]
    fn test_initial_facts() {
        let mut c = press_circuit();
        c.init(Signal(0));
        let network = c.compile().unwrap();
        assert!(network.initial_state().get(0));
    }

    #[test]
    fn test_unreachable_gates_are_dropped() {
        let mut c = press_circuit();
        let before = c.compile().unwrap().num_components();
        let done = Signal(0);
        let unused = c.not(done);
        c.and(&[unused, done]);
        assert_eq!(c.compile().unwrap().num_components(), before);
    }

    #[test]
    fn test_compile_split() {
        let (transitions, goals) = press_circuit().compile_split().unwrap();
        assert_eq!(transitions.roles()[0].num_goals, 0);
        assert_eq!(transitions.roles()[0].num_inputs_legals, 2);
        assert_eq!(goals.roles()[0].num_goals, 2);
        assert_eq!(goals.roles()[0].num_inputs_legals, 0);
        assert_eq!(goals.transition_for(0), None);
        assert_eq!(goals.num_bases(), transitions.num_bases());
    }

    #[test]
    fn test_goal_reading_input_cannot_split() {
        let mut c = Circuit::new();
        let solo = c.role("solo");
        let always = c.constant(true);
        let go = c.action(solo, "go", always);
        c.goal(solo, 100, go);
        c.terminal(always);
        assert!(c.compile().is_ok());
        assert!(matches!(c.compile_split(), Err(NetworkError::Circuit(_))));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut c = Circuit::new();
        c.role("solo");
        // Patch an OR gate to read itself.
        let gate = c.or(&[]);
        c.nodes[gate.0] = Node::Or(vec![gate]);
        c.terminal(gate);
        assert_eq!(
            c.compile().unwrap_err(),
            NetworkError::Circuit("circuit contains a cycle".into())
        );
    }

    #[test]
    fn test_next_on_non_base_is_reported() {
        let mut c = press_circuit();
        let gate = c.constant(false);
        c.next(gate, gate);
        assert!(matches!(c.compile(), Err(NetworkError::Circuit(_))));
    }
}
