//! Provider descriptors
//!
//! What an api provider publishes: library beans built by plain factory
//! closures, and service beans bound through a service component. Descriptor
//! discovery is not done here; callers hand an already-enumerated list of
//! [`ApiProvider`]s to the context configurer.

pub mod definition;
pub mod provider;

pub use definition::{BeanSource, ServiceDefinition};
pub use provider::{ApiProvider, LibraryDefinition, PublishedBean, ServiceBeanDefinition};
