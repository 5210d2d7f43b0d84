//! Per-component display and scoring annotations.
//!
//! Meta annotations never influence propagation. They carry the text used to
//! label moves for humans and the integer score attached to goal components.

/// Annotation attached to a single component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaComponent {
    /// Logical type tag as named by the compiler (e.g. "base", "legal", "and")
    pub component_type: String,

    /// GDL text of the proposition, empty for anonymous gates
    pub gdl: String,

    /// Move text for input/legal components (e.g. "(mark 1 1)")
    pub move_text: Option<String>,

    /// Score carried by a goal component
    pub goal_value: Option<i32>,
}

impl MetaComponent {
    pub fn new(component_type: impl Into<String>, gdl: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            gdl: gdl.into(),
            move_text: None,
            goal_value: None,
        }
    }

    /// Builder method for move text
    pub fn with_move(mut self, move_text: impl Into<String>) -> Self {
        self.move_text = Some(move_text.into());
        self
    }

    /// Builder method for goal value
    pub fn with_goal(mut self, value: i32) -> Self {
        self.goal_value = Some(value);
        self
    }

    /// Display label: move text if present, GDL text otherwise.
    pub fn label(&self) -> &str {
        self.move_text.as_deref().unwrap_or(&self.gdl)
    }
}
