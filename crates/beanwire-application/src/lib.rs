//! Application Layer - beanwire
//!
//! Defines the extension points of the bean runtime and the descriptors that
//! providers publish through them.
//!
//! ## Architecture
//!
//! The application layer:
//! - Defines ports for factories, post-processors, service components, discovery,
//!   fault tolerance, versioned serialization and configuration sources
//! - Provides [`proxy::Forwarder`], the explicit forwarding proxy every service
//!   interface implements through [`proxy::ServiceApi`]
//! - Describes what providers publish: [`publish::ApiProvider`] with its library
//!   and service bean definitions
//! - Has no dependencies on infrastructure or concrete plugins
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `beanwire-domain`: bean identity, instances and error kinds
//! - Pure Rust libraries for serialization, logging and concurrency

pub mod ports;
pub mod proxy;
pub mod publish;
pub mod registry;

pub use ports::*;
pub use proxy::{Forwarder, Interceptor, ServiceApi};
pub use publish::{
    ApiProvider, LibraryDefinition, PublishedBean, ServiceBeanDefinition, ServiceDefinition,
};
pub use registry::ServiceComponentRegistry;
