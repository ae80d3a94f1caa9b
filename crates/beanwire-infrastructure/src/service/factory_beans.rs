//! Factory beans for provider-published beans

use std::sync::Arc;

use beanwire_application::ports::{FactoryBean, ServiceDiscovery};
use beanwire_application::publish::{BeanSource, LibraryDefinition, ServiceDefinition};
use beanwire_application::registry::ServiceComponentRegistry;
use beanwire_domain::{Bean, BeanKey, CreationContext, Lifecycle, Result, StatefulBean};
use tracing::warn;

use super::decorator::{BeanFaultToleranceFactory, ServiceBeanDecorator};
use super::instance::ServiceBeanInstance;
use super::lease::ServiceLeaseManager;

/// Creates a library bean and applies fault tolerance when the library asks for it
pub struct LibraryFactoryBean {
    library: LibraryDefinition,
    fault_tolerance: Arc<BeanFaultToleranceFactory>,
}

impl LibraryFactoryBean {
    pub fn new(library: LibraryDefinition, fault_tolerance: Arc<BeanFaultToleranceFactory>) -> Self {
        Self {
            library,
            fault_tolerance,
        }
    }
}

impl FactoryBean for LibraryFactoryBean {
    fn create(&self, ctx: &dyn CreationContext) -> Result<Bean> {
        let bean = self.library.create(ctx)?;
        if !self.library.is_fault_tolerant() {
            return Ok(bean);
        }
        let lifecycle = bean.lifecycle().cloned();
        let guarded = self
            .library
            .decorate_guarded(bean, self.fault_tolerance.guard_for(self.library.key()))?;
        Ok(match lifecycle {
            Some(lifecycle) => guarded.with_lifecycle(lifecycle),
            None => guarded,
        })
    }

    fn bean_key(&self) -> &BeanKey {
        self.library.key()
    }
}

/// Shared collaborators of every service bean in a context
#[derive(Clone)]
pub struct ServiceBinder {
    pub components: Arc<ServiceComponentRegistry>,
    pub decorator: Arc<ServiceBeanDecorator>,
    pub leases: Arc<ServiceLeaseManager>,
}

/// Creates a stateful service bean and attempts its first binding
#[derive(Clone)]
pub struct ServiceFactoryBean {
    definition: ServiceDefinition,
    discovery: Arc<dyn ServiceDiscovery>,
    binder: ServiceBinder,
}

impl ServiceFactoryBean {
    pub fn new(
        definition: ServiceDefinition,
        discovery: Arc<dyn ServiceDiscovery>,
        binder: ServiceBinder,
    ) -> Self {
        Self {
            definition,
            discovery,
            binder,
        }
    }
}

impl FactoryBean for ServiceFactoryBean {
    /// A bean whose first bind fails for any reason other than configuration is
    /// still created, unbound; lease renewal binds it later.
    fn create(&self, _ctx: &dyn CreationContext) -> Result<Bean> {
        let instance = Arc::new(ServiceBeanInstance::new(
            self.definition.clone(),
            Arc::clone(&self.discovery),
            Arc::clone(&self.binder.components),
            Arc::clone(&self.binder.decorator),
        )?);
        match instance.bind() {
            Ok(()) => {}
            Err(err) if err.is_configuration() => return Err(err),
            Err(err) => {
                warn!(bean_key = %self.definition.bean_key(), error = %err, "Service bean created unbound");
            }
        }
        self.binder.leases.track(&instance);

        let current = Arc::clone(&instance);
        let source: BeanSource = Arc::new(move || current.current());
        let stateful: Arc<dyn StatefulBean> = instance.clone();
        let lifecycle: Arc<dyn Lifecycle> = instance;
        Ok(self
            .definition
            .late_bound(source)
            .with_stateful(stateful)
            .with_lifecycle(lifecycle))
    }

    fn bean_key(&self) -> &BeanKey {
        self.definition.bean_key()
    }

    fn qualified_variant(&self, key: &BeanKey) -> Option<Arc<dyn FactoryBean>> {
        if !self.definition.has_dynamic_qualifier() {
            return None;
        }
        Some(Arc::new(Self {
            definition: self.definition.for_key(key.clone()),
            ..self.clone()
        }))
    }
}
