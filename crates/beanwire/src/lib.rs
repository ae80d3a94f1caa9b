//! # Beanwire
//!
//! A dependency-injection runtime with isolated modules, lazily bound remote
//! services and per-bean configuration.
//!
//! This crate is the public facade. It re-exports the layers below so that
//! applications depend on a single crate.
//!
//! ## Features
//!
//! - **Singleton beans**: every key is created at most once, even under
//!   concurrent first access, with explicit cycle detection
//! - **Modules**: private bindings plus explicit imports and exports, resolved
//!   lazily and independently of registration order
//! - **Service beans**: proxies that bind through a discovery and a transport
//!   component, rebind on lease renewal and can be awaited until bound
//! - **Per-bean settings**: fault tolerance and versioning tuned per bean from
//!   layered, live configuration sources
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use beanwire::prelude::*;
//!
//! let context = ContextConfigurer::new()
//!     .register_component(Arc::new(DirectComponent::new()))
//!     .register_api_provider(
//!         ApiProvider::new("greetings")
//!             .with_service(ServiceDefinition::new::<dyn Greeter>(), registry.clone()),
//!     )
//!     .configure()?;
//!
//! let greeter = context.wait_for_bean::<dyn Greeter>(None, Duration::from_secs(5))?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - bean identity, instances, settings and errors
//! - `application` - ports, service proxies and provider descriptors
//! - `infrastructure` - bean factory, modules, configuration and service binding
//! - `providers` - direct component, in-memory registry, fault-tolerance and
//!   versioning plugins

/// Domain layer - bean identity, instances, settings and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use beanwire_domain::*;
}

/// Application layer - ports, proxies and provider descriptors
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use beanwire_application::*;
}

/// Infrastructure layer - bean factory, modules, configuration and binding
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use beanwire_infrastructure::*;
}

/// Provider implementations
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use beanwire_providers::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::{Bean, BeanKey, BeanType, Component, CreationContext, Error, Lifecycle, Result};

// Re-export the context entry points at the crate root
pub use infrastructure::{BeanContext, ContextConfigurer, Module, ModuleContext};

/// Everything needed to declare modules, publish services and build a context
pub mod prelude {
    pub use beanwire_application::ports::{
        BeanPostProcessor, FactoryBean, FaultTolerancePolicy, ServiceComponent, ServiceDiscovery,
        ServicePublisher,
    };
    pub use beanwire_application::proxy::{Forwarder, ServiceApi};
    pub use beanwire_application::publish::{
        ApiProvider, LibraryDefinition, ServiceBeanDefinition, ServiceDefinition,
    };
    pub use beanwire_domain::settings::{FAULT_TOLERANCE_ENABLED, INITIAL_TIMEOUT};
    pub use beanwire_domain::{
        Bean, BeanDefaults, BeanKey, BeanType, Component, CreationContext, Error, Lifecycle,
        ObjectSerializerDefinition, Result, ServiceProperties, StatefulBean,
    };
    pub use beanwire_infrastructure::config::ConfigLoader;
    pub use beanwire_infrastructure::logging::init_logging;
    pub use beanwire_infrastructure::{BeanContext, ContextConfigurer, Module, ModuleContext};
    pub use beanwire_providers::{
        CircuitBreakerPolicy, DirectComponent, InMemoryServiceRegistry, JsonVersioningPlugin,
        NoFaultTolerance,
    };
}
