//! Fault-tolerance policy implementations
//!
//! | Policy | Name | Behavior |
//! |--------|------|----------|
//! | [`NoFaultTolerance`] | `none` | Runs every call directly |
//! | [`CircuitBreakerPolicy`] | `circuit-breaker` | Fails fast after consecutive failures |

pub mod circuit_breaker;
pub mod none;

use std::sync::Arc;

use beanwire_application::ports::fault_tolerance::FaultTolerancePolicy;
use beanwire_application::ports::registry::{FaultTolerancePolicyConfig, FaultTolerancePolicyEntry};
use beanwire_domain::{Error, Result};

pub use circuit_breaker::CircuitBreakerPolicy;
pub use none::NoFaultTolerance;

use crate::constants::{CIRCUIT_BREAKER_POLICY, NO_FAULT_TOLERANCE_POLICY};

/// Every available fault-tolerance policy
pub static FAULT_TOLERANCE_POLICIES: &[FaultTolerancePolicyEntry] = &[
    FaultTolerancePolicyEntry {
        name: NO_FAULT_TOLERANCE_POLICY,
        description: "Pass-through policy that runs every call directly",
        factory: |_config| Arc::new(NoFaultTolerance),
    },
    FaultTolerancePolicyEntry {
        name: CIRCUIT_BREAKER_POLICY,
        description: "Opens a per-command circuit after consecutive failures",
        factory: |config| Arc::new(CircuitBreakerPolicy::from_config(config)),
    },
];

/// Resolve a fault-tolerance policy by name from the registry
pub fn resolve_fault_tolerance_policy(
    config: &FaultTolerancePolicyConfig,
) -> Result<Arc<dyn FaultTolerancePolicy>> {
    FAULT_TOLERANCE_POLICIES
        .iter()
        .find(|entry| entry.name == config.policy)
        .map(|entry| (entry.factory)(config))
        .ok_or_else(|| {
            let available: Vec<&str> = FAULT_TOLERANCE_POLICIES
                .iter()
                .map(|entry| entry.name)
                .collect();
            Error::configuration(format!(
                "Unknown fault-tolerance policy '{}'. Available policies: {available:?}",
                config.policy
            ))
        })
}

/// List all registered fault-tolerance policies as (name, description) pairs
pub fn list_fault_tolerance_policies() -> Vec<(&'static str, &'static str)> {
    FAULT_TOLERANCE_POLICIES
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect()
}
