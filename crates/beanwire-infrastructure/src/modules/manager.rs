//! Module manager
//!
//! Owns the registered modules and the reverse index from exported type to the
//! modules exporting it. Cross-module edges are resolved only when used, so
//! modules can be registered in any order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use beanwire_application::ports::FactoryBean;
use beanwire_domain::{Bean, BeanKey, BeanType, Error, ResolutionChain, Result};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::module::{Module, ModuleContext};
use super::registry::{ModuleExportFactoryBean, ModuleRegistry};
use crate::beans::BeanFactory;

/// One registered module and its private injector
pub struct ModuleInstance {
    name: String,
    exports: Vec<BeanType>,
    imports: Vec<BeanType>,
    factory: BeanFactory,
}

impl ModuleInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exports(&self) -> &[BeanType] {
        &self.exports
    }

    pub fn imports(&self) -> &[BeanType] {
        &self.imports
    }

    /// The module's private bean factory
    pub fn factory(&self) -> &BeanFactory {
        &self.factory
    }
}

impl fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("name", &self.name)
            .field("exports", &self.exports)
            .field("imports", &self.imports)
            .finish()
    }
}

#[derive(Default)]
pub(crate) struct ManagerInner {
    modules: RwLock<Vec<Arc<ModuleInstance>>>,
    exports: RwLock<HashMap<BeanType, Vec<Arc<ModuleInstance>>>>,
}

impl ManagerInner {
    /// Module that provides `key`: the module named by its qualifier, or the
    /// first registered exporter
    fn exporter_of(&self, key: &BeanKey) -> Result<Arc<ModuleInstance>> {
        let exports = self.exports.read();
        let owners = exports.get(key.bean_type()).map(Vec::as_slice).unwrap_or_default();
        match key.qualifier() {
            Some(module) => owners
                .iter()
                .find(|owner| owner.name == module)
                .cloned()
                .ok_or_else(|| {
                    Error::configuration(format!(
                        "Module '{module}' does not export {}",
                        key.bean_type()
                    ))
                }),
            None => {
                let first = owners.first().cloned().ok_or_else(|| {
                    Error::configuration(format!(
                        "No registered module exports {}",
                        key.bean_type()
                    ))
                })?;
                if owners.len() > 1 {
                    let candidates: Vec<&str> = owners.iter().map(|owner| owner.name()).collect();
                    warn!(
                        bean_type = %key.bean_type(),
                        chosen = %first.name,
                        ?candidates,
                        "Type is exported by more than one module; using the first registered"
                    );
                }
                Ok(first)
            }
        }
    }

    pub(crate) fn resolve_export(&self, key: &BeanKey, chain: &ResolutionChain) -> Result<Bean> {
        let module = self.exporter_of(key)?;
        module
            .factory
            .resolve(&BeanKey::unqualified(*key.bean_type()), chain)
    }
}

/// Registers modules and resolves their exports
#[derive(Default)]
pub struct ModuleManager {
    inner: Arc<ManagerInner>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare `module` and add it to the export index
    ///
    /// Fails if a module of the same name is already registered or the module
    /// binds a key twice. Imports are not checked until they are used.
    pub fn register(&self, module: &dyn Module) -> Result<()> {
        let name = module.name();
        if self.inner.modules.read().iter().any(|m| m.name == name) {
            return Err(Error::configuration(format!(
                "Module '{name}' is already registered"
            )));
        }

        let mut context = ModuleContext::new(name.clone());
        module.prepare(&mut context);
        let ModuleContext {
            bindings,
            exports,
            imports,
            ..
        } = context;

        let registry = ModuleRegistry::new(
            name.clone(),
            bindings,
            &imports,
            Arc::downgrade(&self.inner),
        )?;
        let instance = Arc::new(ModuleInstance {
            factory: BeanFactory::new(format!("module:{name}"), Arc::new(registry)),
            name: name.clone(),
            exports,
            imports,
        });

        {
            let mut index = self.inner.exports.write();
            for bean_type in &instance.exports {
                index
                    .entry(*bean_type)
                    .or_default()
                    .push(Arc::clone(&instance));
            }
        }
        self.inner.modules.write().push(Arc::clone(&instance));

        info!(
            module = %name,
            exports = instance.exports.len(),
            imports = instance.imports.len(),
            "Registered module"
        );
        Ok(())
    }

    /// Exported instance of `T`, from the first registered exporter
    pub fn get_instance<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.get_export::<T>(&BeanKey::of::<T>())
    }

    /// Exported instance of `T` from the module named `module`
    pub fn get_qualified<T: ?Sized + Send + Sync + 'static>(&self, module: &str) -> Result<Arc<T>> {
        self.get_export::<T>(&BeanKey::qualified::<T>(module))
    }

    fn get_export<T: ?Sized + Send + Sync + 'static>(&self, key: &BeanKey) -> Result<Arc<T>> {
        self.resolve_export(key)?
            .downcast::<T>()
            .ok_or_else(|| Error::BeanTypeMismatch {
                key: key.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolve an exported key; a qualifier selects the exporting module by name
    pub fn resolve_export(&self, key: &BeanKey) -> Result<Bean> {
        self.inner.resolve_export(key, &ResolutionChain::default())
    }

    /// One key per module exporting `bean_type`, qualified by module name, in
    /// registration order
    pub fn beans_of_type(&self, bean_type: &BeanType) -> Vec<BeanKey> {
        self.inner
            .exports
            .read()
            .get(bean_type)
            .map(|owners| {
                owners
                    .iter()
                    .map(|owner| BeanKey::new(*bean_type, Some(owner.name.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every exported type
    pub fn exported_types(&self) -> Vec<BeanType> {
        self.inner.exports.read().keys().copied().collect()
    }

    /// Factory beans publishing every export into an application registry
    ///
    /// Each exported type gets its unqualified key (the default pick) plus one
    /// key qualified by the name of each exporting module.
    pub fn export_factory_beans(&self) -> Vec<Arc<dyn FactoryBean>> {
        let index = self.inner.exports.read();
        let mut factories: Vec<Arc<dyn FactoryBean>> = Vec::new();
        for (bean_type, owners) in index.iter() {
            let keys = std::iter::once(BeanKey::unqualified(*bean_type)).chain(
                owners
                    .iter()
                    .map(|owner| BeanKey::new(*bean_type, Some(owner.name.clone()))),
            );
            for key in keys {
                factories.push(Arc::new(ModuleExportFactoryBean {
                    key,
                    manager: Arc::downgrade(&self.inner),
                }));
            }
        }
        factories
    }

    /// Registered modules, in registration order
    pub fn modules(&self) -> Vec<Arc<ModuleInstance>> {
        self.inner.modules.read().clone()
    }

    /// Destroy every module's injector
    ///
    /// Modules are torn down independently, most recently registered first.
    pub fn destroy(&self) {
        let modules = self.modules();
        for module in modules.iter().rev() {
            debug!(module = %module.name, "Destroying module");
            module.factory.destroy();
        }
    }
}

impl fmt::Debug for ModuleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleManager")
            .field("modules", &self.inner.modules.read().len())
            .finish()
    }
}
