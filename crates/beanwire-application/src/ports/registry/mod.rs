//! Plugin Registry
//!
//! Named plugin entries that configuration can select by name.

pub mod fault_tolerance;

pub use fault_tolerance::{FaultTolerancePolicyConfig, FaultTolerancePolicyEntry};
