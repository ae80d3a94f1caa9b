//! Service component registry
//!
//! Components are selected by the name carried inside [`ServiceProperties`].
//! An unknown name is a configuration error listing what is available.
//!
//! [`ServiceProperties`]: beanwire_domain::ServiceProperties

use std::sync::Arc;

use beanwire_domain::{Error, Result};
use dashmap::DashMap;
use tracing::debug;

use crate::ports::component::ServiceComponent;

/// Service components by name
#[derive(Default)]
pub struct ServiceComponentRegistry {
    components: DashMap<String, Arc<dyn ServiceComponent>>,
}

impl ServiceComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its own name
    pub fn register(&self, component: Arc<dyn ServiceComponent>) -> Result<()> {
        let name = component.name().to_string();
        match self.components.entry(name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(Error::configuration(format!(
                "Service component '{name}' is already registered"
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                debug!(component = %name, "Registered service component");
                slot.insert(component);
                Ok(())
            }
        }
    }

    /// Component registered as `name`
    pub fn get(&self, name: &str) -> Result<Arc<dyn ServiceComponent>> {
        if let Some(component) = self.components.get(name) {
            return Ok(Arc::clone(component.value()));
        }
        let mut available = self.names();
        available.sort();
        Err(Error::configuration(format!(
            "Unknown service component '{name}'. Available components: {available:?}"
        )))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.components.iter().map(|entry| entry.key().clone()).collect()
    }
}
