//! Infrastructure layer constants
//!
//! Runtime limits, configuration names and logging defaults.

// ============================================================================
// KEY LOCK CONSTANTS
// ============================================================================

/// Number of lock buckets a key lock stripes its keys over
pub const KEY_LOCK_BUCKETS: usize = 17;

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "BEANWIRE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "beanwire.toml";

/// Default interval between service lease renewals, in milliseconds
pub const DEFAULT_LEASE_RENEWAL_INTERVAL_MS: u64 = 30_000;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "BEANWIRE_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// SERVICE CONSTANTS
// ============================================================================

/// Prefix of the configuration entries holding service uris
pub const SERVICE_URI_PREFIX: &str = "beanwire.service";

/// Suffix of a service uri configuration entry
pub const SERVICE_URI_SETTING: &str = "uri";

/// Separator between component name and component-specific part of a service uri
pub const SERVICE_URI_SEPARATOR: char = ':';
