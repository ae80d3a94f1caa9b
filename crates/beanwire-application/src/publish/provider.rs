//! Api provider descriptors

use std::fmt;
use std::sync::Arc;

use beanwire_domain::{Bean, BeanDefaults, BeanKey, CreationContext, Result};

use crate::ports::discovery::ServiceDiscovery;
use crate::proxy::{Interceptor, ServiceApi};

use super::definition::{ServiceDefinition, guarded};

/// Builds a library bean from its dependencies
pub type LibraryFactory = Arc<dyn Fn(&dyn CreationContext) -> Result<Bean> + Send + Sync>;

type GuardFn = fn(&BeanKey, Bean, Arc<dyn Interceptor>) -> Result<Bean>;

/// A bean produced in-process by a plain factory closure
#[derive(Clone)]
pub struct LibraryDefinition {
    key: BeanKey,
    factory: LibraryFactory,
    guard: Option<GuardFn>,
    defaults: BeanDefaults,
}

impl LibraryDefinition {
    /// Library bean of type `T`
    pub fn new<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn CreationContext) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self::from_bean_factory(BeanKey::of::<T>(), move |ctx| factory(ctx).map(Bean::new))
    }

    /// Library bean of service interface `T` whose calls run through the
    /// fault-tolerance policy when the bean's setting enables it
    pub fn fault_tolerant<T, F>(factory: F) -> Self
    where
        T: ServiceApi + ?Sized,
        F: Fn(&dyn CreationContext) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            guard: Some(guarded::<T> as GuardFn),
            ..Self::new::<T, F>(factory)
        }
    }

    /// Library bean whose factory builds the [`Bean`] itself, for instance to
    /// attach lifecycle hooks
    pub fn from_bean_factory(
        key: BeanKey,
        factory: impl Fn(&dyn CreationContext) -> Result<Bean> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            factory: Arc::new(factory),
            guard: None,
            defaults: BeanDefaults::default(),
        }
    }

    #[must_use]
    pub fn qualified(mut self, qualifier: impl Into<String>) -> Self {
        self.key = self.key.with_qualifier(Some(qualifier.into()));
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: BeanDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn key(&self) -> &BeanKey {
        &self.key
    }

    pub fn defaults(&self) -> &BeanDefaults {
        &self.defaults
    }

    pub fn is_fault_tolerant(&self) -> bool {
        self.guard.is_some()
    }

    pub fn create(&self, ctx: &dyn CreationContext) -> Result<Bean> {
        (self.factory)(ctx)
    }

    /// Wrap `bean` with `guard` if this library is fault tolerant
    pub fn decorate_guarded(&self, bean: Bean, guard: Arc<dyn Interceptor>) -> Result<Bean> {
        match self.guard {
            Some(decorate) => decorate(&self.key, bean, guard),
            None => Ok(bean),
        }
    }
}

impl fmt::Debug for LibraryDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryDefinition")
            .field("key", &self.key)
            .field("fault_tolerant", &self.guard.is_some())
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// A service bean plus the discovery used to find its provider
#[derive(Clone)]
pub struct ServiceBeanDefinition {
    definition: ServiceDefinition,
    discovery: Arc<dyn ServiceDiscovery>,
    defaults: BeanDefaults,
}

impl ServiceBeanDefinition {
    pub fn new(definition: ServiceDefinition, discovery: Arc<dyn ServiceDiscovery>) -> Self {
        Self {
            definition,
            discovery,
            defaults: BeanDefaults::default(),
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: BeanDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn definition(&self) -> &ServiceDefinition {
        &self.definition
    }

    pub fn discovery(&self) -> &Arc<dyn ServiceDiscovery> {
        &self.discovery
    }

    pub fn defaults(&self) -> &BeanDefaults {
        &self.defaults
    }
}

impl fmt::Debug for ServiceBeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceBeanDefinition")
            .field("definition", &self.definition)
            .field("discovery", &self.discovery.describe())
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// One bean published by an api provider
#[derive(Debug, Clone)]
pub enum PublishedBean {
    Library(LibraryDefinition),
    Service(ServiceBeanDefinition),
}

impl PublishedBean {
    pub fn key(&self) -> &BeanKey {
        match self {
            Self::Library(library) => library.key(),
            Self::Service(service) => service.definition().bean_key(),
        }
    }

    pub fn defaults(&self) -> &BeanDefaults {
        match self {
            Self::Library(library) => library.defaults(),
            Self::Service(service) => service.defaults(),
        }
    }
}

/// An already-discovered provider descriptor
#[derive(Debug, Clone)]
pub struct ApiProvider {
    name: String,
    beans: Vec<PublishedBean>,
}

impl ApiProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beans: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: LibraryDefinition) -> Self {
        self.beans.push(PublishedBean::Library(library));
        self
    }

    /// Publish a service found through `discovery`
    #[must_use]
    pub fn with_service(
        self,
        definition: ServiceDefinition,
        discovery: Arc<dyn ServiceDiscovery>,
    ) -> Self {
        self.with_service_bean(ServiceBeanDefinition::new(definition, discovery))
    }

    #[must_use]
    pub fn with_service_bean(mut self, service: ServiceBeanDefinition) -> Self {
        let definition = service.definition.clone().defined_by(self.name.clone());
        self.beans.push(PublishedBean::Service(ServiceBeanDefinition {
            definition,
            ..service
        }));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn beans(&self) -> &[PublishedBean] {
        &self.beans
    }
}
