//! Module contract and the context modules declare their wiring in

use std::sync::Arc;

use beanwire_application::ports::FactoryBean;
use beanwire_domain::{Bean, BeanKey, BeanType, Component, CreationContext, Result};

use crate::beans::{FnFactoryBean, InstanceFactoryBean};

/// A composition unit with private bindings and explicit imports and exports
///
/// Modules are constructed by the application and handed to
/// [`ModuleManager::register`](super::ModuleManager::register); `prepare` runs
/// exactly once, during registration.
pub trait Module: Send + Sync + 'static {
    /// Name used to qualify this module's exports
    fn name(&self) -> String {
        BeanType::of::<Self>().short_name().to_string()
    }

    /// Declare bindings, imports and exports
    fn prepare(&self, context: &mut ModuleContext);
}

/// Declarations collected from one module's `prepare`
pub struct ModuleContext {
    module: String,
    pub(crate) bindings: Vec<Arc<dyn FactoryBean>>,
    pub(crate) exports: Vec<BeanType>,
    pub(crate) imports: Vec<BeanType>,
}

impl ModuleContext {
    pub(crate) fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            bindings: Vec::new(),
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Name of the module being prepared
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Bind `T` to a provider closure
    pub fn bind<T, F>(&mut self, provider: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn CreationContext) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.bind_factory(Arc::new(FnFactoryBean::of::<T, F>(provider)))
    }

    /// Bind `T` under `qualifier` to a provider closure
    pub fn bind_qualified<T, F>(&mut self, qualifier: impl Into<String>, provider: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn CreationContext) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let key = BeanKey::qualified::<T>(qualifier);
        self.bind_factory(Arc::new(FnFactoryBean::new(key, move |ctx| {
            provider(ctx).map(Bean::new)
        })))
    }

    /// Bind `T` to an instance the module does not manage
    pub fn bind_instance<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) -> &mut Self {
        self.bind_factory(Arc::new(InstanceFactoryBean::of(instance)))
    }

    /// Bind interface `T` to component `C`, constructed through this module
    pub fn bind_to<T, C>(&mut self, upcast: impl Fn(Arc<C>) -> Arc<T> + Send + Sync + 'static) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        C: Component,
    {
        self.bind::<T, _>(move |ctx| ctx.component::<C>().map(&upcast))
    }

    /// Bind a prepared factory bean
    pub fn bind_factory(&mut self, factory: Arc<dyn FactoryBean>) -> &mut Self {
        self.bindings.push(factory);
        self
    }

    /// Publish `T` to other modules and the application
    pub fn export<T: ?Sized + 'static>(&mut self) -> &mut Self {
        let bean_type = BeanType::of::<T>();
        if !self.exports.contains(&bean_type) {
            self.exports.push(bean_type);
        }
        self
    }

    /// Satisfy `T` from another module's export
    pub fn import<T: ?Sized + 'static>(&mut self) -> &mut Self {
        let bean_type = BeanType::of::<T>();
        if !self.imports.contains(&bean_type) {
            self.imports.push(bean_type);
        }
        self
    }
}
