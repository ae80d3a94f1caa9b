//! Domain layer constants
//!
//! Names and defaults that are part of the bean model itself. Runtime and
//! configuration constants live in the infrastructure crate.

// ============================================================================
// BEAN SETTING CONSTANTS
// ============================================================================

/// Namespace prefix for per-bean setting names
pub const BEAN_SETTING_PREFIX: &str = "beanwire.bean";

/// Setting name toggling fault tolerance for a bean
pub const FAULT_TOLERANCE_ENABLED_SETTING: &str = "faultTolerance.enabled";

/// Setting name for a bean's call timeout in milliseconds
pub const FAULT_TOLERANCE_TIMEOUT_SETTING: &str = "faultTolerance.timeout";

/// Default call timeout in milliseconds
pub const DEFAULT_FAULT_TOLERANCE_TIMEOUT_MS: i32 = 1000;

// ============================================================================
// SERVICE PROPERTY CONSTANTS
// ============================================================================

/// Property naming the service component that can bind a service
pub const SERVICE_PROPERTY_COMPONENT: &str = "_component";

/// Property naming the service api type
pub const SERVICE_PROPERTY_API: &str = "_api";

/// Property carrying the service qualifier
pub const SERVICE_PROPERTY_QUALIFIER: &str = "_qualifier";
