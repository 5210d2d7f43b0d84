//! Compiled network tables and the compilation handoff.
//!
//! A compiler hands the finished circuit over in tabular form through
//! [`NetworkBuilder`]: roles, components, the flat fan-out array, meta
//! annotations and the initial position. [`NetworkBuilder::finalise`]
//! validates the tables and freezes them into an immutable [`Network`] that
//! any number of state machines can share.
//!
//! # Component id layout
//!
//! ```text
//! [0, num_bases)                          base propositions (position bit i)
//! [num_bases, num_bases + num_transitions) transitions (next value of base i)
//! elsewhere                               inputs, legals, goals, terminal, gates
//! ```

use tracing::debug;

use crate::component::{Component, ComponentId, ComponentSpec, ComponentTag};
use crate::error::NetworkError;
use crate::meta::MetaComponent;
use crate::position::Position;
use crate::role::Role;

/// Table sizes declared up front by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkShape {
    pub role_count: usize,
    pub num_bases: usize,
    pub num_transitions: usize,
    pub num_components: usize,
    pub num_outputs: usize,
    /// Exclusive upper bound on topological ranks.
    pub topological_size: usize,
}

/// Immutable compiled network.
#[derive(Debug, Clone)]
pub struct Network {
    shape: NetworkShape,
    roles: Vec<Role>,
    components: Vec<Component>,
    outputs: Vec<u32>,
    meta: Vec<MetaComponent>,
    initial_state: Position,
    terminal_index: ComponentId,
    settle_order: Vec<u32>,
}

impl Network {
    #[inline]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    #[inline]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[inline]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    #[inline]
    pub fn num_bases(&self) -> usize {
        self.shape.num_bases
    }

    #[inline]
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[inline]
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id]
    }

    /// Fan-out of `id`, sorted by topological rank.
    #[inline]
    pub fn fan_out(&self, id: ComponentId) -> &[u32] {
        &self.outputs[self.components[id].outputs()]
    }

    #[inline]
    pub fn meta(&self, id: ComponentId) -> &MetaComponent {
        &self.meta[id]
    }

    #[inline]
    pub fn initial_state(&self) -> &Position {
        &self.initial_state
    }

    #[inline]
    pub fn terminal_index(&self) -> ComponentId {
        self.terminal_index
    }

    /// Transition component producing base `base`, if any.
    #[inline]
    pub fn transition_for(&self, base: usize) -> Option<ComponentId> {
        (base < self.shape.num_transitions).then_some(self.shape.num_bases + base)
    }

    /// All component ids in non-decreasing topological rank.
    pub(crate) fn settle_order(&self) -> &[u32] {
        &self.settle_order
    }

    /// Look up a role by name.
    pub fn role_index(&self, name: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.name == name)
    }
}

/// Collects the tabular handoff and validates it into a [`Network`].
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    shape: NetworkShape,
    roles: Vec<Option<Role>>,
    components: Vec<Option<ComponentSpec>>,
    outputs: Vec<Option<u32>>,
    meta: Vec<MetaComponent>,
    initial_state: Option<Position>,
}

impl NetworkBuilder {
    pub fn new(shape: NetworkShape) -> Self {
        Self {
            shape,
            roles: vec![None; shape.role_count],
            components: vec![None; shape.num_components],
            outputs: vec![None; shape.num_outputs],
            meta: vec![MetaComponent::default(); shape.num_components],
            initial_state: None,
        }
    }

    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    pub fn set_role(&mut self, index: usize, role: Role) -> Result<(), NetworkError> {
        let count = self.roles.len();
        let slot = self
            .roles
            .get_mut(index)
            .ok_or(NetworkError::RoleOutOfRange { index, count })?;
        *slot = Some(role);
        Ok(())
    }

    pub fn set_component(
        &mut self,
        id: ComponentId,
        spec: ComponentSpec,
    ) -> Result<(), NetworkError> {
        let count = self.components.len();
        let slot = self
            .components
            .get_mut(id)
            .ok_or(NetworkError::ComponentOutOfRange { id, count })?;
        *slot = Some(spec);
        Ok(())
    }

    pub fn set_output(&mut self, index: usize, id: ComponentId) -> Result<(), NetworkError> {
        if id >= self.components.len() {
            return Err(NetworkError::ComponentOutOfRange {
                id,
                count: self.components.len(),
            });
        }
        let count = self.outputs.len();
        let slot = self
            .outputs
            .get_mut(index)
            .ok_or(NetworkError::OutputOutOfRange { index, count })?;
        *slot = Some(id as u32);
        Ok(())
    }

    pub fn set_meta_component(
        &mut self,
        id: ComponentId,
        meta: MetaComponent,
    ) -> Result<(), NetworkError> {
        let count = self.meta.len();
        let slot = self
            .meta
            .get_mut(id)
            .ok_or(NetworkError::ComponentOutOfRange { id, count })?;
        *slot = meta;
        Ok(())
    }

    pub fn set_initial_state(&mut self, state: Position) -> Result<(), NetworkError> {
        if state.len() != self.shape.num_bases {
            return Err(NetworkError::InitialStateSize {
                expected: self.shape.num_bases,
                actual: state.len(),
            });
        }
        self.initial_state = Some(state);
        Ok(())
    }

    /// Validate every table and freeze the network.
    pub fn finalise(self, terminal_index: ComponentId) -> Result<Network, NetworkError> {
        let shape = self.shape;
        let count = shape.num_components;

        if shape.num_transitions > shape.num_bases {
            return Err(NetworkError::TooManyTransitions {
                transitions: shape.num_transitions,
                bases: shape.num_bases,
            });
        }
        if shape.num_bases + shape.num_transitions > count {
            return Err(NetworkError::ComponentOutOfRange {
                id: shape.num_bases + shape.num_transitions,
                count,
            });
        }
        if terminal_index >= count {
            return Err(NetworkError::ComponentOutOfRange {
                id: terminal_index,
                count,
            });
        }

        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(NetworkError::MissingOutput(index)))
            .collect::<Result<Vec<u32>, _>>()?;

        let specs = self
            .components
            .iter()
            .enumerate()
            .map(|(id, slot)| slot.ok_or(NetworkError::MissingComponent(id)))
            .collect::<Result<Vec<ComponentSpec>, _>>()?;

        let roles = self
            .roles
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(NetworkError::MissingRole(index)))
            .collect::<Result<Vec<Role>, _>>()?;

        let tags = assign_tags(&shape, &roles, terminal_index)?;

        for (id, spec) in specs.iter().enumerate() {
            if spec.required_count_true == spec.required_count_false {
                return Err(NetworkError::DegenerateThresholds {
                    id,
                    threshold: spec.required_count_true,
                });
            }
            if spec.incr == 0 {
                return Err(NetworkError::ZeroIncrement(id));
            }
            if spec.topological_order >= shape.topological_size {
                return Err(NetworkError::RankOutOfRange {
                    id,
                    rank: spec.topological_order,
                    size: shape.topological_size,
                });
            }
            let end = spec.output_index + spec.number_outputs;
            if end > outputs.len() {
                return Err(NetworkError::FanOutOutOfRange {
                    id,
                    start: spec.output_index,
                    end,
                    count: outputs.len(),
                });
            }
        }

        let components: Vec<Component> = specs
            .iter()
            .zip(&tags)
            .map(|(spec, tag)| Component::from_spec(spec, *tag))
            .collect();

        let mut outputs = outputs;
        for (from, component) in components.iter().enumerate() {
            let fan_out = &mut outputs[component.outputs()];
            for &to in fan_out.iter() {
                let target = &components[to as usize];
                if target.tag.is_source() {
                    return Err(NetworkError::EdgeIntoSource {
                        from,
                        to: to as usize,
                    });
                }
                if target.rank <= component.rank {
                    return Err(NetworkError::RankOrderViolated {
                        from,
                        to: to as usize,
                        from_rank: component.rank as usize,
                        to_rank: target.rank as usize,
                    });
                }
            }
            fan_out.sort_by_key(|&to| (components[to as usize].rank, to));
        }

        for role in &roles {
            for id in role.goals() {
                if self.meta[id].goal_value.is_none() {
                    return Err(NetworkError::MissingGoalValue(id));
                }
            }
        }

        let mut settle_order: Vec<u32> = (0..count as u32).collect();
        settle_order.sort_by_key(|&id| (components[id as usize].rank, id));

        let initial_state = self
            .initial_state
            .unwrap_or_else(|| Position::new(shape.num_bases));

        debug!(
            roles = roles.len(),
            bases = shape.num_bases,
            transitions = shape.num_transitions,
            components = count,
            outputs = outputs.len(),
            "Network finalised"
        );

        Ok(Network {
            shape,
            roles,
            components,
            outputs,
            meta: self.meta,
            initial_state,
            terminal_index,
            settle_order,
        })
    }
}

fn assign_tags(
    shape: &NetworkShape,
    roles: &[Role],
    terminal_index: ComponentId,
) -> Result<Vec<ComponentTag>, NetworkError> {
    let count = shape.num_components;
    let mut tags = vec![ComponentTag::Gate; count];
    let mut owner: Vec<Option<usize>> = vec![None; count];

    tags[..shape.num_bases].fill(ComponentTag::Base);
    tags[shape.num_bases..shape.num_bases + shape.num_transitions].fill(ComponentTag::Transition);

    for (index, role) in roles.iter().enumerate() {
        if role.input_start >= count && role.num_inputs_legals > 0 {
            return Err(invalid_range(index, "input", role.inputs()));
        }
        for (what, range) in role.ranges() {
            if range.end > count {
                return Err(invalid_range(index, what, range));
            }
            let r = index as u32;
            let tag = match what {
                "input" => ComponentTag::Input { role: r },
                "legal" => ComponentTag::Legal { role: r },
                _ => ComponentTag::Goal { role: r },
            };
            for id in range.clone() {
                if let Some(first) = owner[id] {
                    return Err(NetworkError::OverlappingRoles {
                        first,
                        second: index,
                    });
                }
                if tags[id] != ComponentTag::Gate {
                    return Err(invalid_range(index, what, range));
                }
                owner[id] = Some(index);
                tags[id] = tag;
            }
        }
    }

    if tags[terminal_index] != ComponentTag::Gate {
        return Err(NetworkError::ConflictingTag {
            id: terminal_index,
            existing: tags[terminal_index].as_str(),
            requested: ComponentTag::Terminal.as_str(),
        });
    }
    tags[terminal_index] = ComponentTag::Terminal;

    Ok(tags)
}

fn invalid_range(role: usize, what: &'static str, range: std::ops::Range<usize>) -> NetworkError {
    NetworkError::InvalidRoleRange {
        role,
        what,
        start: range.start,
        end: range.end,
    }
}
