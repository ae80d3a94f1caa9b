//! Runtime configuration types

use std::time::Duration;

use beanwire_application::ports::FaultTolerancePolicyConfig;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEASE_RENEWAL_INTERVAL_MS, DEFAULT_LOG_LEVEL};

/// Root configuration loaded by [`ConfigLoader`](super::ConfigLoader)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Log subscriber settings
    pub logging: LoggingConfig,
    /// Service binding settings
    pub services: ServiceConfig,
    /// Fault-tolerance policy selection
    pub fault_tolerance: FaultTolerancePolicyConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}

/// Service binding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interval between lease renewals of service beans, in milliseconds
    pub lease_renewal_interval_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lease_renewal_interval_ms: DEFAULT_LEASE_RENEWAL_INTERVAL_MS,
        }
    }
}

impl ServiceConfig {
    pub fn lease_renewal_interval(&self) -> Duration {
        Duration::from_millis(self.lease_renewal_interval_ms)
    }
}
