//! Compiled propagation-network state machine for general game playing
//!
//! This crate evaluates games compiled into a Boolean circuit of
//! counting-threshold components:
//! - `Position`: Bit vector of persistent facts, owned by the caller
//! - `NetworkBuilder`: Tabular compilation handoff, validated into a `Network`
//! - `Circuit`: Gate-level builder that compiles into a `Network`
//! - `StateMachine`: Incremental evaluator over a shared `Network`
//! - `CombinedStateMachine`: Primary evaluator plus auxiliary scoring networks
//! - `DepthChargeTest`: Random-rollout throughput benchmark
//! - `registry`: Named network factories
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use propnet_core::{Circuit, JointMove, StateMachine};
//!
//! let mut c = Circuit::new();
//! let solo = c.role("solo");
//! let done = c.base("(done)");
//! let open = c.not(done);
//! let press = c.action(solo, "press", open);
//! c.next(done, press);
//! c.goal(solo, 100, done);
//! c.goal(solo, 0, open);
//! c.terminal(done);
//!
//! let mut sm = StateMachine::new(Arc::new(c.compile().unwrap()));
//! let mut next = sm.new_base_state();
//! sm.next_state(&JointMove::from_choices(vec![0]), &mut next).unwrap();
//! assert!(sm.is_terminal());
//! assert_eq!(sm.goal_value(0).unwrap(), 100);
//! ```

pub mod circuit;
pub mod combined;
pub mod component;
pub mod depth_charge;
pub mod error;
pub mod interface;
pub mod legal;
pub mod meta;
pub mod network;
pub mod position;
pub mod registry;
pub mod role;
pub mod state_machine;


// Re-export main types for convenience
pub use circuit::{Circuit, Signal};
pub use combined::CombinedStateMachine;
pub use component::{Component, ComponentId, ComponentSpec, ComponentTag};
pub use depth_charge::DepthChargeTest;
pub use error::{NetworkError, StateMachineError};
pub use interface::StateMachineInterface;
pub use legal::{JointMove, LegalState};
pub use meta::MetaComponent;
pub use network::{Network, NetworkBuilder, NetworkShape};
pub use position::Position;
pub use registry::{
    clear_registry, create_network, is_registered, list_registered_networks, register_network,
    NetworkFactory,
};
pub use role::Role;
pub use state_machine::StateMachine;

/// Test utilities (internal use only)
#[cfg(test)]
pub(crate) mod test_utils {
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    /// Global mutex to serialize all registry-dependent tests
    pub static REGISTRY_TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
}
