//! Service exporting
//!
//! Server-side counterpart of binding: a provider instance is made reachable
//! through a component and its properties are published for discovery.

use std::sync::Arc;

use beanwire_application::ports::ServicePublisher;
use beanwire_application::publish::ServiceDefinition;
use beanwire_application::registry::ServiceComponentRegistry;
use beanwire_domain::{Bean, Result, ServiceProperties};
use tracing::info;

/// Exports provider instances through named components
pub struct ServiceExporter {
    components: Arc<ServiceComponentRegistry>,
    publisher: Arc<dyn ServicePublisher>,
}

impl ServiceExporter {
    pub fn new(components: Arc<ServiceComponentRegistry>, publisher: Arc<dyn ServicePublisher>) -> Self {
        Self {
            components,
            publisher,
        }
    }

    /// Export `provider` for `definition` through the component named `component`
    pub fn export<T: ?Sized + Send + Sync + 'static>(
        &self,
        definition: &ServiceDefinition,
        component: &str,
        provider: Arc<T>,
    ) -> Result<ServiceProperties> {
        self.export_bean(definition, component, Bean::new(provider))
    }

    /// Export an already type-erased provider and publish its properties
    pub fn export_bean(
        &self,
        definition: &ServiceDefinition,
        component: &str,
        provider: Bean,
    ) -> Result<ServiceProperties> {
        let component = self.components.get(component)?;
        if component.requires_provider_instance() {
            component.export_service(definition, provider)?;
        }
        let mut properties = component.create_service_properties(definition)?;
        properties.set_component(component.name());
        properties.set_api(definition.bean_key());
        self.publisher.publish(properties.clone())?;
        info!(
            bean_key = %definition.bean_key(),
            component = %component.name(),
            "Exported service"
        );
        Ok(properties)
    }
}
