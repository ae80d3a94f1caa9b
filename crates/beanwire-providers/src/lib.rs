//! # beanwire - Plugin Implementations
//!
//! Concrete implementations of the ports declared in `beanwire-application`.
//!
//! ## Plugin Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Transport | `ServiceComponent` | Direct (in-process) |
//! | Discovery | `ServiceDiscovery`, `ServicePublisher` | InMemoryServiceRegistry |
//! | Fault tolerance | `FaultTolerancePolicy` | NoFaultTolerance, CircuitBreakerPolicy |
//! | Versioning | `ObjectSerializerFactory` | JsonVersioningPlugin |
//!
//! ## Usage
//!
//! ```ignore
//! use beanwire_providers::direct::DirectComponent;
//! use beanwire_providers::fault_tolerance::resolve_fault_tolerance_policy;
//! ```

// Re-export domain types commonly used with providers
pub use beanwire_domain::error::{Error, Result};

/// Provider-specific constants
pub mod constants;

/// In-process service component
pub mod direct;

/// Fault-tolerance policies
pub mod fault_tolerance;

/// In-memory service discovery and publishing
pub mod registry;

/// Versioned serialization plugins
pub mod versioning;

pub use direct::DirectComponent;
pub use fault_tolerance::{CircuitBreakerPolicy, NoFaultTolerance, resolve_fault_tolerance_policy};
pub use registry::InMemoryServiceRegistry;
pub use versioning::{JsonMigration, JsonObjectSerializer, JsonVersioningPlugin};
