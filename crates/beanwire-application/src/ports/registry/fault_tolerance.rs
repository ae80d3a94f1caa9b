//! Fault-Tolerance Policy Registry
//!
//! Entry type for fault-tolerance policies. The providers crate lists the
//! available entries and resolves one from [`FaultTolerancePolicyConfig`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ports::fault_tolerance::FaultTolerancePolicy;

/// Configuration for fault-tolerance policy creation
///
/// Policies use what they need and ignore the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultTolerancePolicyConfig {
    /// Policy name (e.g., "none", "circuit-breaker")
    pub policy: String,
    /// Consecutive failures that open a circuit
    pub failure_threshold: u32,
    /// How long an open circuit rejects calls, in milliseconds
    pub open_duration_ms: u64,
}

impl Default for FaultTolerancePolicyConfig {
    fn default() -> Self {
        Self {
            policy: String::from("none"),
            failure_threshold: 5,
            open_duration_ms: 10_000,
        }
    }
}

impl FaultTolerancePolicyConfig {
    /// Create a new config with the given policy name
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            ..Default::default()
        }
    }

    /// Set the failure threshold
    #[must_use]
    pub fn with_failure_threshold(mut self, failure_threshold: u32) -> Self {
        self.failure_threshold = failure_threshold;
        self
    }

    /// Set the open duration in milliseconds
    #[must_use]
    pub fn with_open_duration_ms(mut self, open_duration_ms: u64) -> Self {
        self.open_duration_ms = open_duration_ms;
        self
    }
}

/// Registry entry for fault-tolerance policies
pub struct FaultTolerancePolicyEntry {
    /// Unique policy name (e.g., "none", "circuit-breaker")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create a policy instance
    pub factory: fn(&FaultTolerancePolicyConfig) -> Arc<dyn FaultTolerancePolicy>,
}
