//! Port Interfaces
//!
//! Boundary contracts between the bean runtime and its plugins.
//!
//! ## Organization
//!
//! - **factory.rs** - Factory beans, factory registries and post-processors
//! - **component.rs** - Service components and bound service instances
//! - **discovery.rs** - Service discovery and publishing
//! - **fault_tolerance.rs** - Fault-tolerance policies and the call guard
//! - **serialization.rs** - Versioned object serialization
//! - **config.rs** - Configuration sources
//! - **registry/** - Named plugin entries selectable from configuration

/// Configuration sources
pub mod config;
/// Service components and bound instances
pub mod component;
/// Service discovery and publishing
pub mod discovery;
/// Factory beans and post-processors
pub mod factory;
/// Fault-tolerance policies
pub mod fault_tolerance;
/// Plugin entries selectable by name
pub mod registry;
/// Versioned serialization
pub mod serialization;

// Re-export commonly used port traits for convenience
pub use component::{BoundServiceBeanInstance, ServiceComponent};
pub use config::ConfigSource;
pub use discovery::{ServiceDiscovery, ServicePublisher};
pub use factory::{BeanPostProcessor, FactoryBean, FactoryBeanRegistry};
pub use fault_tolerance::{CommandSettings, FaultToleranceGuard, FaultTolerancePolicy};
pub use registry::{FaultTolerancePolicyConfig, FaultTolerancePolicyEntry};
pub use serialization::{ObjectSerializer, ObjectSerializerFactory, VersionedCodec};
