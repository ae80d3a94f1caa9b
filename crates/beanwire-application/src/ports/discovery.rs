//! Service discovery ports

use beanwire_domain::{BeanKey, Result, ServiceProperties};

/// Looks up how to reach a service
pub trait ServiceDiscovery: Send + Sync {
    /// Properties of a provider for `key`, or `None` when none is available yet
    fn discover(&self, key: &BeanKey) -> Result<Option<ServiceProperties>>;

    /// Short description used in logs
    fn describe(&self) -> String {
        String::from("service discovery")
    }
}

/// Makes exported services discoverable
pub trait ServicePublisher: Send + Sync {
    fn publish(&self, properties: ServiceProperties) -> Result<()>;
}
