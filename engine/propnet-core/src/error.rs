//! Error types for network compilation handoff and state machine usage.

use thiserror::Error;

/// Errors raised while validating a compiled network in [`NetworkBuilder::finalise`].
///
/// [`NetworkBuilder::finalise`]: crate::network::NetworkBuilder::finalise
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("Component {id} out of range (network has {count} components)")]
    ComponentOutOfRange { id: usize, count: usize },

    #[error("Output slot {index} out of range (network has {count} output slots)")]
    OutputOutOfRange { index: usize, count: usize },

    #[error("Role {index} out of range (network has {count} roles)")]
    RoleOutOfRange { index: usize, count: usize },

    #[error("Component {0} was never defined")]
    MissingComponent(usize),

    #[error("Output slot {0} was never assigned")]
    MissingOutput(usize),

    #[error("Role {0} was never defined")]
    MissingRole(usize),

    #[error("Component {id}: fan-out [{start}, {end}) exceeds {count} output slots")]
    FanOutOutOfRange {
        id: usize,
        start: usize,
        end: usize,
        count: usize,
    },

    #[error("Component {id}: true and false thresholds are both {threshold}")]
    DegenerateThresholds { id: usize, threshold: i32 },

    #[error("Component {0}: increment must be non-zero")]
    ZeroIncrement(usize),

    #[error("Component {id}: topological rank {rank} exceeds size {size}")]
    RankOutOfRange { id: usize, rank: usize, size: usize },

    #[error("Edge {from} -> {to} does not increase topological rank ({from_rank} -> {to_rank})")]
    RankOrderViolated {
        from: usize,
        to: usize,
        from_rank: usize,
        to_rank: usize,
    },

    #[error("Role {role}: {what} range [{start}, {end}) is invalid")]
    InvalidRoleRange {
        role: usize,
        what: &'static str,
        start: usize,
        end: usize,
    },

    #[error("Roles {first} and {second} have overlapping component ranges")]
    OverlappingRoles { first: usize, second: usize },

    #[error("Layout has {transitions} transitions but only {bases} bases")]
    TooManyTransitions { transitions: usize, bases: usize },

    #[error("Initial state has {actual} facts, expected {expected}")]
    InitialStateSize { expected: usize, actual: usize },

    #[error("Component {id} cannot be both {existing} and {requested}")]
    ConflictingTag {
        id: usize,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("Edge {from} -> {to} drives a base or input proposition")]
    EdgeIntoSource { from: usize, to: usize },

    #[error("Goal component {0} has no goal value annotation")]
    MissingGoalValue(usize),

    #[error("Circuit error: {0}")]
    Circuit(String),

    #[error("No network registered under '{0}'")]
    UnknownNetwork(String),
}

/// Usage errors from the state machine interface.
///
/// These are caller mistakes: the evaluator refuses the operation instead of
/// producing a silently wrong position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("Role {role} out of range (game has {count} roles)")]
    RoleOutOfRange { role: usize, count: usize },

    #[error("Role {role}: choice {choice} out of range ({count} actions)")]
    ChoiceOutOfRange {
        role: usize,
        choice: usize,
        count: usize,
    },

    #[error("Role {role}: choice {choice} is not legal in the current position")]
    IllegalChoice { role: usize, choice: usize },

    #[error("Component {id} out of range (network has {count} components)")]
    ComponentOutOfRange { id: usize, count: usize },

    #[error("Position has {actual} facts, expected {expected}")]
    PositionSize { expected: usize, actual: usize },

    #[error("Joint move has {actual} entries, expected {expected}")]
    JointMoveSize { expected: usize, actual: usize },

    #[error("Goal value requested before the position is terminal")]
    NotTerminal,

    #[error("Role {0}: no goal proposition is true")]
    NoGoal(usize),

    #[error("Role {0} has no legal moves in a non-terminal position")]
    NoLegalMoves(usize),

    #[error("Auxiliary network has {actual} {what}, primary has {expected}")]
    IncompatibleNetwork {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
