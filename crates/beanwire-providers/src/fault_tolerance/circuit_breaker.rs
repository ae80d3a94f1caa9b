//! Circuit-breaking policy
//!
//! Each command key has its own circuit. A circuit opens after
//! `failure_threshold` consecutive failures and rejects calls with
//! `ServiceUnavailable` until `open_duration` has passed; exactly one caller is
//! then let through as a trial while the others keep failing fast, and the
//! trial closes the circuit on success or reopens it on failure. A call that succeeds but takes longer than the command timeout is
//! reported as a timeout and counts as a failure.

use std::time::{Duration, Instant};

use beanwire_application::ports::fault_tolerance::{CommandSettings, FaultTolerancePolicy};
use beanwire_application::ports::registry::FaultTolerancePolicyConfig;
use beanwire_domain::{Error, Result};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::constants::CIRCUIT_BREAKER_POLICY;

#[derive(Debug, Default, Clone, Copy)]
struct Circuit {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Per-command circuit breaker
#[derive(Debug)]
pub struct CircuitBreakerPolicy {
    failure_threshold: u32,
    open_duration: Duration,
    circuits: DashMap<String, Circuit>,
}

impl CircuitBreakerPolicy {
    pub fn new(failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            open_duration,
            circuits: DashMap::new(),
        }
    }

    pub fn from_config(config: &FaultTolerancePolicyConfig) -> Self {
        Self::new(
            config.failure_threshold,
            Duration::from_millis(config.open_duration_ms),
        )
    }

    /// Whether the circuit for `command_key` currently rejects calls
    pub fn is_open(&self, command_key: &str) -> bool {
        self.circuits.get(command_key).is_some_and(|circuit| {
            circuit.opened_at.is_some_and(|opened_at| {
                circuit.trial_in_flight || opened_at.elapsed() < self.open_duration
            })
        })
    }

    /// Whether a call may run now; claims the trial slot of a half-open circuit
    fn admit(&self, command_key: &str) -> bool {
        let Some(mut circuit) = self.circuits.get_mut(command_key) else {
            return true;
        };
        let Some(opened_at) = circuit.opened_at else {
            return true;
        };
        if circuit.trial_in_flight || opened_at.elapsed() < self.open_duration {
            return false;
        }
        circuit.trial_in_flight = true;
        debug!(command = %command_key, "Circuit half-open, admitting trial call");
        true
    }

    fn record(&self, command_key: &str, succeeded: bool) {
        let mut circuit = self.circuits.entry(command_key.to_string()).or_default();
        if succeeded {
            if circuit.opened_at.is_some() {
                debug!(command = %command_key, "Circuit closed");
            }
            *circuit = Circuit::default();
            return;
        }
        circuit.consecutive_failures += 1;
        circuit.trial_in_flight = false;
        if circuit.consecutive_failures >= self.failure_threshold {
            if circuit.opened_at.is_none() {
                warn!(
                    command = %command_key,
                    failures = circuit.consecutive_failures,
                    "Circuit opened"
                );
            }
            circuit.opened_at = Some(Instant::now());
        }
    }
}

impl FaultTolerancePolicy for CircuitBreakerPolicy {
    fn execute(
        &self,
        command: &CommandSettings,
        call: &mut dyn FnMut() -> Result<()>,
    ) -> Result<()> {
        if !self.admit(&command.command_key) {
            return Err(Error::service_unavailable(format!(
                "Circuit for {} is open",
                command.command_key
            )));
        }

        let started = Instant::now();
        let outcome = match call() {
            Ok(()) if started.elapsed() > command.timeout => Err(Error::timeout(format!(
                "{}.{} exceeded {:?}",
                command.command_key, command.method, command.timeout
            ))),
            other => other,
        };
        self.record(&command.command_key, outcome.is_ok());
        outcome
    }

    fn name(&self) -> &str {
        CIRCUIT_BREAKER_POLICY
    }
}
