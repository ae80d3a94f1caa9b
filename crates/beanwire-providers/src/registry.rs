//! In-memory service registry
//!
//! Discovery and publishing backed by a concurrent map keyed by api type and
//! qualifier. Pairs with the direct component for in-process wiring.

use beanwire_application::ports::discovery::{ServiceDiscovery, ServicePublisher};
use beanwire_domain::{BeanKey, Error, Result, ServiceProperties};
use dashmap::DashMap;
use tracing::debug;

fn entry_key(api: &str, qualifier: Option<&str>) -> String {
    match qualifier {
        Some(qualifier) => format!("{api}#{qualifier}"),
        None => api.to_string(),
    }
}

/// Service registry held in process memory
#[derive(Debug, Default)]
pub struct InMemoryServiceRegistry {
    entries: DashMap<String, ServiceProperties>,
}

impl InMemoryServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `properties` as the provider of `key`
    pub fn register(&self, key: &BeanKey, mut properties: ServiceProperties) {
        properties.set_api(key);
        let entry = entry_key(key.bean_type().name(), key.qualifier());
        debug!(bean_key = %key, properties = %properties, "Registered service");
        self.entries.insert(entry, properties);
    }

    /// Forget the provider of `key`
    pub fn deregister(&self, key: &BeanKey) -> Option<ServiceProperties> {
        self.entries
            .remove(&entry_key(key.bean_type().name(), key.qualifier()))
            .map(|(_, properties)| properties)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ServiceDiscovery for InMemoryServiceRegistry {
    fn discover(&self, key: &BeanKey) -> Result<Option<ServiceProperties>> {
        Ok(self
            .entries
            .get(&entry_key(key.bean_type().name(), key.qualifier()))
            .map(|entry| entry.value().clone()))
    }

    fn describe(&self) -> String {
        format!("in-memory registry ({} services)", self.entries.len())
    }
}

impl ServicePublisher for InMemoryServiceRegistry {
    fn publish(&self, properties: ServiceProperties) -> Result<()> {
        let api = properties
            .api()
            .ok_or_else(|| Error::configuration(format!("Cannot publish {properties}: no api")))?;
        let entry = entry_key(api, properties.qualifier());
        debug!(entry = %entry, "Published service");
        self.entries.insert(entry, properties);
        Ok(())
    }
}
