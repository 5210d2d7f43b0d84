//! Counting-threshold components of a compiled network.
//!
//! Every node of the circuit is the same flat record. A component keeps a
//! live counter; its boolean output turns true when the counter reaches the
//! true threshold and false when it reaches the false threshold. AND, OR,
//! NOT and constants differ only in their thresholds and initial counter:
//!
//! | gate          | true threshold | false threshold | initial count |
//! |---------------|----------------|-----------------|---------------|
//! | OR of n       | 1              | 0               | 0             |
//! | AND of n      | n              | n - 1           | 0             |
//! | NOT           | 0              | 1               | 0             |
//! | constant true | 0              | -1              | 0             |
//!
//! When the threshold pair is inverted (true < false) the counter is read
//! the other way round, which is how negation works without a gate type.

/// Index of a component in a network.
pub type ComponentId = usize;

/// Structural role of a component, fixed at compilation handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentTag {
    /// Internal gate.
    Gate,
    /// Persistent fact; value is driven by the current position.
    Base,
    /// `does` proposition for a role; value is driven by the joint move.
    Input { role: u32 },
    /// Legality of the matching input for a role.
    Legal { role: u32 },
    /// Goal proposition for a role.
    Goal { role: u32 },
    /// The terminal proposition.
    Terminal,
    /// Next-state value of the base with the same offset.
    Transition,
}

impl ComponentTag {
    /// Sources are set directly rather than through their counter.
    #[inline]
    pub fn is_source(self) -> bool {
        matches!(self, ComponentTag::Base | ComponentTag::Input { .. })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentTag::Gate => "gate",
            ComponentTag::Base => "base",
            ComponentTag::Input { .. } => "input",
            ComponentTag::Legal { .. } => "legal",
            ComponentTag::Goal { .. } => "goal",
            ComponentTag::Terminal => "terminal",
            ComponentTag::Transition => "transition",
        }
    }
}

/// Tabular component description as supplied by a compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    pub required_count_false: i32,
    pub required_count_true: i32,
    /// First slot of this component's fan-out in the flat output array.
    pub output_index: usize,
    pub number_outputs: usize,
    pub initial_count: i32,
    /// Delta pushed into every fan-out when this component turns true
    /// (negated when it turns false).
    pub incr: i32,
    pub topological_order: usize,
}

impl ComponentSpec {
    pub fn or(output_index: usize, number_outputs: usize, rank: usize) -> Self {
        Self {
            required_count_false: 0,
            required_count_true: 1,
            output_index,
            number_outputs,
            initial_count: 0,
            incr: 1,
            topological_order: rank,
        }
    }

    pub fn and(inputs: usize, output_index: usize, number_outputs: usize, rank: usize) -> Self {
        Self {
            required_count_false: inputs as i32 - 1,
            required_count_true: inputs as i32,
            ..Self::or(output_index, number_outputs, rank)
        }
    }

    pub fn not(output_index: usize, number_outputs: usize, rank: usize) -> Self {
        Self {
            required_count_false: 1,
            required_count_true: 0,
            ..Self::or(output_index, number_outputs, rank)
        }
    }
}

/// Runtime component record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub true_threshold: i32,
    pub false_threshold: i32,
    /// +1 for upward gates, -1 for inverted ones.
    sign: i32,
    pub incr: i32,
    pub initial_count: i32,
    pub outputs_start: u32,
    pub outputs_len: u32,
    pub rank: u32,
    pub tag: ComponentTag,
}

impl Component {
    pub(crate) fn from_spec(spec: &ComponentSpec, tag: ComponentTag) -> Self {
        Self {
            true_threshold: spec.required_count_true,
            false_threshold: spec.required_count_false,
            sign: if spec.required_count_true > spec.required_count_false {
                1
            } else {
                -1
            },
            incr: spec.incr,
            initial_count: spec.initial_count,
            outputs_start: spec.output_index as u32,
            outputs_len: spec.number_outputs as u32,
            rank: spec.topological_order as u32,
            tag,
        }
    }

    /// Output after the counter moved to `count`, given the previous output.
    #[inline(always)]
    pub fn next_value(&self, value: bool, count: i32) -> bool {
        if value {
            self.sign * (count - self.false_threshold) > 0
        } else {
            self.sign * (count - self.true_threshold) >= 0
        }
    }

    /// Output of a freshly settled component holding `count`.
    #[inline]
    pub fn settled_value(&self, count: i32) -> bool {
        self.next_value(false, count)
    }

    #[inline]
    pub fn outputs(&self) -> std::ops::Range<usize> {
        let start = self.outputs_start as usize;
        start..start + self.outputs_len as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(spec: ComponentSpec) -> Component {
        Component::from_spec(&spec, ComponentTag::Gate)
    }

    #[test]
    fn test_or_thresholds() {
        let or = gate(ComponentSpec::or(0, 0, 0));
        assert!(!or.settled_value(0));
        assert!(or.next_value(false, 1));
        assert!(or.next_value(true, 2));
        assert!(or.next_value(true, 1));
        assert!(!or.next_value(true, 0));
    }

    #[test]
    fn test_and_thresholds() {
        let and = gate(ComponentSpec::and(3, 0, 0, 0));
        assert!(!and.settled_value(0));
        assert!(!and.next_value(false, 2));
        assert!(and.next_value(false, 3));
        assert!(!and.next_value(true, 2));
    }

    #[test]
    fn test_not_thresholds() {
        let not = gate(ComponentSpec::not(0, 0, 0));
        assert!(not.settled_value(0));
        assert!(!not.next_value(true, 1));
        assert!(not.next_value(false, 0));
    }

    #[test]
    fn test_constant_true() {
        let constant = gate(ComponentSpec::and(0, 0, 0, 0));
        assert!(constant.settled_value(0));
    }

    #[test]
    fn test_large_increment_still_crosses() {
        // Weighted edge of 2 skipping over the exact threshold value.
        let or = gate(ComponentSpec {
            required_count_true: 1,
            required_count_false: 0,
            ..ComponentSpec::or(0, 0, 0)
        });
        assert!(or.next_value(false, 2));
        assert!(!or.next_value(true, -1));
    }
}
