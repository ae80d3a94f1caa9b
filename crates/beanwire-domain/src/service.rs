//! Service connection properties and serializer descriptors

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bean::BeanKey;
use crate::constants::{
    SERVICE_PROPERTY_API, SERVICE_PROPERTY_COMPONENT, SERVICE_PROPERTY_QUALIFIER,
};

/// Transport-specific description of how to reach a bound service instance
///
/// Produced by service discovery and consumed by the service component named
/// in the [`SERVICE_PROPERTY_COMPONENT`] entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProperties {
    properties: BTreeMap<String, String>,
}

impl ServiceProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties pre-populated with the api and qualifier of `key`
    pub fn for_key(key: &BeanKey) -> Self {
        let mut properties = Self::new();
        properties.set_api(key);
        properties
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder form of [`ServiceProperties::set`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.remove(name)
    }

    /// Name of the component that can bind these properties
    pub fn component_name(&self) -> Option<&str> {
        self.get(SERVICE_PROPERTY_COMPONENT)
    }

    pub fn set_component(&mut self, component: impl Into<String>) {
        self.set(SERVICE_PROPERTY_COMPONENT, component);
    }

    pub fn api(&self) -> Option<&str> {
        self.get(SERVICE_PROPERTY_API)
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.get(SERVICE_PROPERTY_QUALIFIER)
    }

    /// Record the api type and qualifier of `key`
    pub fn set_api(&mut self, key: &BeanKey) {
        self.set(SERVICE_PROPERTY_API, key.bean_type().name());
        match key.qualifier() {
            Some(qualifier) => self.set(SERVICE_PROPERTY_QUALIFIER, qualifier),
            None => {
                self.remove(SERVICE_PROPERTY_QUALIFIER);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for ServiceProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .properties
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

/// How a service's payloads are serialized across versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSerializerDefinition {
    version: u32,
    configurer: Option<String>,
}

impl ObjectSerializerDefinition {
    /// A service without versioned serialization
    pub fn non_versioned() -> Self {
        Self::default()
    }

    /// A versioned service at `version` whose migrations are registered under
    /// `configurer`
    pub fn versioned(version: u32, configurer: impl Into<String>) -> Self {
        Self {
            version,
            configurer: Some(configurer.into()),
        }
    }

    pub fn is_versioned(&self) -> bool {
        self.configurer.is_some()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn configurer(&self) -> Option<&str> {
        self.configurer.as_deref()
    }
}
