//! Bean factory registry
//!
//! Keys are registered once. A second registration for the same key is an
//! ambiguity error, never a silent overwrite.

use std::sync::Arc;

use beanwire_application::ports::{FactoryBean, FactoryBeanRegistry};
use beanwire_domain::{BeanKey, BeanType, Error, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Factory beans by key
#[derive(Default)]
pub struct BeanRegistry {
    factories: DashMap<BeanKey, Arc<dyn FactoryBean>>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under its own key
    pub fn register(&self, factory: Arc<dyn FactoryBean>) -> Result<()> {
        let key = factory.bean_key().clone();
        match self.factories.entry(key.clone()) {
            Entry::Occupied(_) => Err(Error::AmbiguousProvider {
                key,
                message: String::from("a factory is already registered for this key"),
            }),
            Entry::Vacant(slot) => {
                debug!(bean_key = %key, "Registered factory bean");
                slot.insert(factory);
                Ok(())
            }
        }
    }

    pub fn contains(&self, key: &BeanKey) -> bool {
        self.factories.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Factory of a dynamically qualified bean whose unqualified factory accepts `key`
    fn dynamic_variant(&self, key: &BeanKey) -> Option<Arc<dyn FactoryBean>> {
        key.qualifier()?;
        let base = Arc::clone(self.factories.get(&key.with_qualifier(None))?.value());
        let variant = base.qualified_variant(key)?;
        // Another thread may have registered the same variant first
        Some(Arc::clone(
            self.factories
                .entry(key.clone())
                .or_insert(variant)
                .value(),
        ))
    }
}

impl FactoryBeanRegistry for BeanRegistry {
    fn factory_bean(&self, key: &BeanKey) -> Result<Arc<dyn FactoryBean>> {
        if let Some(factory) = self.factories.get(key) {
            return Ok(Arc::clone(factory.value()));
        }
        self.dynamic_variant(key)
            .ok_or_else(|| Error::no_such_bean(key))
    }

    fn beans_of_type(&self, bean_type: &BeanType) -> Vec<BeanKey> {
        let mut keys: Vec<BeanKey> = self
            .factories
            .iter()
            .filter(|entry| entry.key().bean_type() == bean_type)
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort_by(|a, b| a.qualifier().cmp(&b.qualifier()));
        keys
    }
}
