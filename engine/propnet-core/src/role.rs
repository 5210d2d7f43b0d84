//! Role definitions: each role owns contiguous input, legal and goal ranges.

use std::ops::Range;

use crate::component::ComponentId;

/// A player of the game and the component ranges it owns.
///
/// Legal component `legal_start + i` guards input component `input_start + i`,
/// so a legal index doubles as the move choice for that role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    pub input_start: ComponentId,
    pub legal_start: ComponentId,
    pub goal_start: ComponentId,
    pub num_inputs_legals: usize,
    pub num_goals: usize,
}

impl Role {
    pub fn new(
        name: impl Into<String>,
        input_start: ComponentId,
        legal_start: ComponentId,
        goal_start: ComponentId,
        num_inputs_legals: usize,
        num_goals: usize,
    ) -> Self {
        Self {
            name: name.into(),
            input_start,
            legal_start,
            goal_start,
            num_inputs_legals,
            num_goals,
        }
    }

    #[inline]
    pub fn inputs(&self) -> Range<ComponentId> {
        self.input_start..self.input_start + self.num_inputs_legals
    }

    #[inline]
    pub fn legals(&self) -> Range<ComponentId> {
        self.legal_start..self.legal_start + self.num_inputs_legals
    }

    #[inline]
    pub fn goals(&self) -> Range<ComponentId> {
        self.goal_start..self.goal_start + self.num_goals
    }

    /// All three ranges, labelled, for validation.
    pub(crate) fn ranges(&self) -> [(&'static str, Range<ComponentId>); 3] {
        [
            ("input", self.inputs()),
            ("legal", self.legals()),
            ("goal", self.goals()),
        ]
    }
}
