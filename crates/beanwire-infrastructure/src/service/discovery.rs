//! Discovery from configuration
//!
//! A service uri `<component>:<component-specific part>` is read from the entry
//! `beanwire.service.<beanType>[.<qualifier>].uri` and parsed by the named
//! component.

use std::sync::Arc;

use beanwire_application::ports::ServiceDiscovery;
use beanwire_application::registry::ServiceComponentRegistry;
use beanwire_domain::{BeanKey, Error, Result, ServiceProperties};

use crate::config::DynamicConfig;
use crate::constants::{SERVICE_URI_PREFIX, SERVICE_URI_SEPARATOR, SERVICE_URI_SETTING};

/// Finds services through uris held in configuration
pub struct ConfigServiceDiscovery {
    config: DynamicConfig,
    components: Arc<ServiceComponentRegistry>,
}

impl ConfigServiceDiscovery {
    pub fn new(config: DynamicConfig, components: Arc<ServiceComponentRegistry>) -> Self {
        Self { config, components }
    }

    /// Configuration entry holding the uri of `key`
    pub fn uri_setting(key: &BeanKey) -> String {
        match key.qualifier() {
            Some(qualifier) => format!(
                "{SERVICE_URI_PREFIX}.{}.{qualifier}.{SERVICE_URI_SETTING}",
                key.bean_type().name()
            ),
            None => format!(
                "{SERVICE_URI_PREFIX}.{}.{SERVICE_URI_SETTING}",
                key.bean_type().name()
            ),
        }
    }
}

impl ServiceDiscovery for ConfigServiceDiscovery {
    fn discover(&self, key: &BeanKey) -> Result<Option<ServiceProperties>> {
        let Some(uri) = self.config.get_string(&Self::uri_setting(key)) else {
            return Ok(None);
        };
        let (component_name, part) = uri.split_once(SERVICE_URI_SEPARATOR).ok_or_else(|| {
            Error::configuration(format!(
                "Service uri '{uri}' for {key} is not of the form <component>:<address>"
            ))
        })?;
        let component = self.components.get(component_name)?;
        let mut properties = component.parse_service_provider_uri(part)?;
        properties.set_component(component_name);
        Ok(Some(properties))
    }

    fn describe(&self) -> String {
        String::from("configuration service discovery")
    }
}
