//! Process-wide registry of compiled networks by name
//!
//! Game crates register a factory per game at start-up; binaries and tests
//! look networks up by name without depending on the game crate's types.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::error::NetworkError;
use crate::network::Network;

/// Factory function type for compiling a network
pub type NetworkFactory = fn() -> Result<Network, NetworkError>;

static REGISTRY: Lazy<Mutex<HashMap<String, NetworkFactory>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn registry() -> MutexGuard<'static, HashMap<String, NetworkFactory>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register a network factory under `name`, replacing any previous one.
pub fn register_network(name: impl Into<String>, factory: NetworkFactory) {
    let name = name.into();
    let mut registry = registry();
    if registry.contains_key(&name) {
        warn!(name = %name, "Overriding existing network registration");
    }
    registry.insert(name, factory);
}

/// Compile the network registered under `name`.
///
/// # Example
///
/// ```rust
/// # use propnet_core::registry::*;
/// match create_network("tictactoe") {
///     Ok(network) => println!("{} roles", network.role_count()),
///     Err(e) => println!("{e}"),
/// }
/// ```
pub fn create_network(name: &str) -> Result<Arc<Network>, NetworkError> {
    // Release the lock before compiling.
    let factory = registry().get(name).copied();
    match factory {
        Some(factory) => factory().map(Arc::new),
        None => {
            warn!(name = %name, "Attempted to create unregistered network");
            Err(NetworkError::UnknownNetwork(name.to_string()))
        }
    }
}

/// Registered names, sorted.
pub fn list_registered_networks() -> Vec<String> {
    let mut names: Vec<String> = registry().keys().cloned().collect();
    names.sort();
    names
}

pub fn is_registered(name: &str) -> bool {
    registry().contains_key(name)
}

/// Remove every registration (mainly for testing)
pub fn clear_registry() {
    registry().clear();
}
