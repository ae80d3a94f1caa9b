//! Direct service component
//!
//! Binds services to provider instances registered in the same process. Used
//! for local wiring and for tests, where no real transport is wanted but the
//! full discovery, binding and decoration path should still run.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use beanwire_application::ports::component::{BoundServiceBeanInstance, ServiceComponent};
use beanwire_application::publish::ServiceDefinition;
use beanwire_domain::{Bean, BeanKey, Error, Result, ServiceProperties};
use dashmap::DashMap;
use tracing::debug;

use crate::constants::{DIRECT_COMPONENT_NAME, DIRECT_PROVIDER_ID_PROPERTY};

/// In-process service component
#[derive(Default)]
pub struct DirectComponent {
    providers: DashMap<String, Bean>,
    exports: DashMap<BeanKey, String>,
    active_bindings: Arc<AtomicUsize>,
}

impl DirectComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider instance and return its id
    pub fn register_provider<T: ?Sized + Send + Sync + 'static>(&self, provider: Arc<T>) -> String {
        self.register_bean(Bean::new(provider))
    }

    pub fn register_bean(&self, provider: Bean) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.providers.insert(id.clone(), provider);
        debug!(provider_id = %id, "Registered direct provider");
        id
    }

    /// Remove a registered provider; existing bindings keep their instance
    pub fn unregister(&self, id: &str) -> bool {
        self.providers.remove(id).is_some()
    }

    /// Service uri for a registered provider id
    pub fn service_uri(id: &str) -> String {
        format!("{DIRECT_COMPONENT_NAME}:{id}")
    }

    /// Properties binding to the provider registered as `id`
    pub fn service_properties(id: &str) -> ServiceProperties {
        let mut properties = ServiceProperties::new().with(DIRECT_PROVIDER_ID_PROPERTY, id);
        properties.set_component(DIRECT_COMPONENT_NAME);
        properties
    }

    /// Bound instances not yet released
    pub fn active_bindings(&self) -> usize {
        self.active_bindings.load(Ordering::SeqCst)
    }
}

impl ServiceComponent for DirectComponent {
    fn name(&self) -> &str {
        DIRECT_COMPONENT_NAME
    }

    fn bind(
        &self,
        definition: &ServiceDefinition,
        properties: &ServiceProperties,
    ) -> Result<BoundServiceBeanInstance> {
        let id = properties.get(DIRECT_PROVIDER_ID_PROPERTY).ok_or_else(|| {
            Error::binding(format!(
                "Missing '{DIRECT_PROVIDER_ID_PROPERTY}' in {properties} for {}",
                definition.bean_key()
            ))
        })?;
        let provider = self
            .providers
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                Error::binding(format!(
                    "No direct provider registered with id '{id}' for {}",
                    definition.bean_key()
                ))
            })?;

        self.active_bindings.fetch_add(1, Ordering::SeqCst);
        let active = Arc::clone(&self.active_bindings);
        debug!(bean_key = %definition.bean_key(), provider_id = %id, "Bound direct service");
        Ok(BoundServiceBeanInstance::with_release(provider, move || {
            active.fetch_sub(1, Ordering::SeqCst);
        }))
    }

    fn parse_service_provider_uri(&self, uri: &str) -> Result<ServiceProperties> {
        if uri.is_empty() {
            return Err(Error::configuration("Direct service uri has no provider id"));
        }
        Ok(Self::service_properties(uri))
    }

    fn create_service_properties(
        &self,
        definition: &ServiceDefinition,
    ) -> Result<ServiceProperties> {
        let id = self
            .exports
            .get(definition.bean_key())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "{} is not exported by the direct component",
                    definition.bean_key()
                ))
            })?;
        Ok(Self::service_properties(&id))
    }

    fn export_service(&self, definition: &ServiceDefinition, provider: Bean) -> Result<()> {
        let id = self.register_bean(provider);
        self.exports.insert(definition.bean_key().clone(), id);
        Ok(())
    }
}
