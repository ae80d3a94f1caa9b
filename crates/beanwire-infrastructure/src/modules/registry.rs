//! Per-module injector registry
//!
//! Resolution order inside a module: its own bindings, then imports (resolved
//! lazily against the manager's export index), then concrete components by
//! construction. Anything else is a configuration error raised on first access.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use beanwire_application::ports::{FactoryBean, FactoryBeanRegistry};
use beanwire_domain::{Bean, BeanKey, BeanType, CreationContext, Error, Result};

use super::manager::ManagerInner;
use crate::beans::{BeanRegistry, ConstructorFactoryBean};

pub(crate) struct ModuleRegistry {
    module: String,
    bindings: BeanRegistry,
    imports: HashSet<BeanType>,
    manager: Weak<ManagerInner>,
}

impl ModuleRegistry {
    pub(crate) fn new(
        module: String,
        bindings: Vec<Arc<dyn FactoryBean>>,
        imports: &[BeanType],
        manager: Weak<ManagerInner>,
    ) -> Result<Self> {
        let registry = BeanRegistry::new();
        for binding in bindings {
            registry.register(binding)?;
        }
        Ok(Self {
            module,
            bindings: registry,
            imports: imports.iter().copied().collect(),
            manager,
        })
    }
}

impl FactoryBeanRegistry for ModuleRegistry {
    fn factory_bean(&self, key: &BeanKey) -> Result<Arc<dyn FactoryBean>> {
        match self.bindings.factory_bean(key) {
            Ok(factory) => return Ok(factory),
            Err(Error::NoSuchBean { .. }) => {}
            Err(err) => return Err(err),
        }
        if self.imports.contains(key.bean_type()) {
            return Ok(Arc::new(ModuleExportFactoryBean {
                key: key.clone(),
                manager: Weak::clone(&self.manager),
            }));
        }
        if key.qualifier().is_none() && key.bean_type().constructor().is_some() {
            return Ok(Arc::new(ConstructorFactoryBean::new(key.clone())?));
        }
        Err(Error::configuration(format!(
            "Module '{}' cannot provide {key}: it is neither bound, imported nor a constructible component",
            self.module
        )))
    }

    fn beans_of_type(&self, bean_type: &BeanType) -> Vec<BeanKey> {
        self.bindings.beans_of_type(bean_type)
    }
}

/// Forwards to the module that exports a key
///
/// Used both for a module's imports and for the exports a context publishes.
/// The instance belongs to the exporting module, so no lifecycle is managed here.
pub(crate) struct ModuleExportFactoryBean {
    pub(crate) key: BeanKey,
    pub(crate) manager: Weak<ManagerInner>,
}

impl FactoryBean for ModuleExportFactoryBean {
    fn create(&self, ctx: &dyn CreationContext) -> Result<Bean> {
        let manager = self.manager.upgrade().ok_or_else(|| {
            Error::illegal_state(format!("Module manager for {} has been dropped", self.key))
        })?;
        manager.resolve_export(&self.key, ctx.resolution_chain())
    }

    fn bean_key(&self) -> &BeanKey {
        &self.key
    }

    fn lifecycled(&self) -> bool {
        false
    }
}
