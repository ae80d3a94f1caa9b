//! Provider-specific constants

// ============================================================================
// DIRECT COMPONENT CONSTANTS
// ============================================================================

/// Name of the in-process service component
pub const DIRECT_COMPONENT_NAME: &str = "direct";

/// Service property holding the id of a directly registered provider
pub const DIRECT_PROVIDER_ID_PROPERTY: &str = "providerId";

// ============================================================================
// FAULT TOLERANCE CONSTANTS
// ============================================================================

/// Name of the pass-through policy
pub const NO_FAULT_TOLERANCE_POLICY: &str = "none";

/// Name of the circuit-breaking policy
pub const CIRCUIT_BREAKER_POLICY: &str = "circuit-breaker";

// ============================================================================
// VERSIONING CONSTANTS
// ============================================================================

/// Envelope field carrying the version a payload was written at
pub const ENVELOPE_VERSION_FIELD: &str = "version";

/// Envelope field carrying the payload
pub const ENVELOPE_PAYLOAD_FIELD: &str = "payload";
