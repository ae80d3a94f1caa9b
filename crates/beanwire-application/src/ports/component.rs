//! Service component port
//!
//! A service component is one transport technology. It turns discovered
//! [`ServiceProperties`] into a callable proxy on the consumer side and exports
//! provider instances on the server side. Components are selected by the name
//! carried in the properties.

use std::fmt;

use beanwire_domain::{Bean, BeanType, Result, ServiceProperties};
use parking_lot::Mutex;

use crate::publish::ServiceDefinition;

/// A pluggable transport binding
pub trait ServiceComponent: Send + Sync {
    /// Unique name used as the dispatch key inside service properties
    fn name(&self) -> &str;

    /// Bind `properties` into a proxy for `definition`
    ///
    /// Must fail fast with a binding error rather than block on connection setup.
    fn bind(
        &self,
        definition: &ServiceDefinition,
        properties: &ServiceProperties,
    ) -> Result<BoundServiceBeanInstance>;

    /// Parse the component-specific part of a `<component>:<part>` service uri
    fn parse_service_provider_uri(&self, uri: &str) -> Result<ServiceProperties>;

    /// Properties consumers need to reach a service exported by this component
    fn create_service_properties(&self, definition: &ServiceDefinition)
    -> Result<ServiceProperties>;

    /// Make `provider` reachable through this component
    fn export_service(&self, definition: &ServiceDefinition, provider: Bean) -> Result<()>;

    /// Whether this component can bind beans of `bean_type`
    fn can_bind_type(&self, bean_type: &BeanType) -> bool {
        let _ = bean_type;
        true
    }

    /// Whether exporting needs the provider instance itself
    fn requires_provider_instance(&self) -> bool {
        true
    }
}

type Release = Box<dyn FnOnce() + Send>;

/// A live proxy plus the transport resource that must be released with it
pub struct BoundServiceBeanInstance {
    bean: Bean,
    release: Mutex<Option<Release>>,
}

impl BoundServiceBeanInstance {
    /// A bound proxy holding no transport resource
    pub fn new(bean: Bean) -> Self {
        Self {
            bean,
            release: Mutex::new(None),
        }
    }

    /// A bound proxy whose resource is freed by `release`
    pub fn with_release(bean: Bean, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            bean,
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    pub fn bean(&self) -> &Bean {
        &self.bean
    }

    /// Release the transport resource; later calls are no-ops
    pub fn release(&self) {
        let release = self.release.lock().take();
        if let Some(release) = release {
            release();
        }
    }
}

impl fmt::Debug for BoundServiceBeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundServiceBeanInstance")
            .field("bean", &self.bean)
            .field("released", &self.release.lock().is_none())
            .finish()
    }
}
