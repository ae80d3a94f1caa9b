//! Service binding layer
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`instance`] | Stateful binding of one service bean |
//! | [`decorator`] | Versioning and fault-tolerance decoration |
//! | [`factory_beans`] | Library and service factory beans |
//! | [`discovery`] | Discovery from configured service uris |
//! | [`exporter`] | Exporting provider instances |
//! | [`lease`] | Periodic lease renewal |

pub mod decorator;
pub mod discovery;
pub mod exporter;
pub mod factory_beans;
pub mod instance;
pub mod lease;

pub use decorator::{BeanFaultToleranceFactory, ServiceBeanDecorator};
pub use discovery::ConfigServiceDiscovery;
pub use exporter::ServiceExporter;
pub use factory_beans::{LibraryFactoryBean, ServiceBinder, ServiceFactoryBean};
pub use instance::ServiceBeanInstance;
pub use lease::ServiceLeaseManager;
