//! Bean context
//!
//! The application-facing handle on a configured runtime: typed lookups,
//! waiting for remote dependencies, exporting services and shutdown.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use beanwire_application::ports::ServicePublisher;
use beanwire_domain::{Bean, BeanKey, BeanType, Error, Result};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::beans::BeanFactory;
use crate::config::{BeanConfiguration, BeanConfigurations, DynamicConfig};
use crate::modules::ModuleManager;
use crate::service::{ServiceBinder, ServiceExporter};

/// A configured set of beans
pub struct BeanContext {
    factory: BeanFactory,
    modules: ModuleManager,
    config: DynamicConfig,
    configurations: Arc<BeanConfigurations>,
    binder: ServiceBinder,
    renewal: Mutex<Option<JoinHandle<()>>>,
    lease_renewal_interval: Duration,
    destroyed: AtomicBool,
}

impl BeanContext {
    pub(crate) fn new(
        factory: BeanFactory,
        modules: ModuleManager,
        config: DynamicConfig,
        configurations: Arc<BeanConfigurations>,
        binder: ServiceBinder,
        lease_renewal_interval: Duration,
    ) -> Self {
        Self {
            factory,
            modules,
            config,
            configurations,
            binder,
            renewal: Mutex::new(None),
            lease_renewal_interval,
            destroyed: AtomicBool::new(false),
        }
    }

    /// The unqualified bean of type `T`
    pub fn get_bean<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.ensure_live()?;
        self.factory.get::<T>(&BeanKey::of::<T>())
    }

    /// The bean of type `T` with `qualifier`
    pub fn get_qualified<T: ?Sized + Send + Sync + 'static>(
        &self,
        qualifier: impl Into<String>,
    ) -> Result<Arc<T>> {
        self.ensure_live()?;
        self.factory.get::<T>(&BeanKey::qualified::<T>(qualifier))
    }

    /// The type-erased bean for `key`
    pub fn bean(&self, key: &BeanKey) -> Result<Bean> {
        self.ensure_live()?;
        self.factory.get_bean(key)
    }

    /// Every registered key of `bean_type`
    pub fn beans_of_type(&self, bean_type: &BeanType) -> Vec<BeanKey> {
        self.factory.beans_of_type(bean_type)
    }

    /// The bean of type `T`, once it and everything it depends on are bound
    pub fn wait_for_bean<T: ?Sized + Send + Sync + 'static>(
        &self,
        qualifier: Option<&str>,
        timeout: Duration,
    ) -> Result<Arc<T>> {
        let key = BeanKey::new(BeanType::of::<T>(), qualifier.map(str::to_string));
        let bean = self.wait_for(&key, timeout)?;
        bean.downcast::<T>().ok_or_else(|| Error::BeanTypeMismatch {
            key,
            expected: std::any::type_name::<T>(),
        })
    }

    /// Resolve `key` and wait until every stateful bean among it and its
    /// dependencies is bound
    ///
    /// Resolution itself never waits. One deadline covers the whole chain; the
    /// wait does not cancel binding, which may still complete later.
    pub fn wait_for(&self, key: &BeanKey, timeout: Duration) -> Result<Bean> {
        self.ensure_live()?;
        // Timeouts too large to fit an `Instant` wait without a deadline
        let deadline = Instant::now().checked_add(timeout);
        let bean = self.factory.get_bean(key)?;
        for dependency in self.factory.dependencies(key)? {
            let dependency_bean = self.factory.get_bean(&dependency)?;
            wait_until_bound(&dependency_bean, deadline)?;
        }
        wait_until_bound(&bean, deadline)?;
        debug!(bean_key = %key, "Bean and its dependencies are bound");
        Ok(bean)
    }

    /// Settings of the bean `key`
    pub fn bean_configuration(&self, key: &BeanKey) -> BeanConfiguration {
        self.configurations.bean_configuration(key)
    }

    pub fn config(&self) -> &DynamicConfig {
        &self.config
    }

    /// Exported instance of `T` from the registered modules
    pub fn module_instance<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.modules.get_instance::<T>()
    }

    pub fn modules(&self) -> &ModuleManager {
        &self.modules
    }

    /// Exporter publishing through `publisher` with this context's components
    pub fn exporter(&self, publisher: Arc<dyn ServicePublisher>) -> ServiceExporter {
        ServiceExporter::new(Arc::clone(&self.binder.components), publisher)
    }

    /// Renew every service lease once, returning how many beans were (re)bound
    pub fn renew_service_leases(&self) -> usize {
        self.binder.leases.renew_leases()
    }

    /// Renew service leases every `interval` on the current tokio runtime
    ///
    /// Replaces any renewal task started earlier.
    pub fn start_lease_renewal(&self, interval: Duration) -> Result<()> {
        self.ensure_live()?;
        let task = self.binder.leases.start(interval)?;
        if let Some(previous) = self.renewal.lock().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// Renew service leases at the configured interval
    pub fn start_configured_lease_renewal(&self) -> Result<()> {
        self.start_lease_renewal(self.lease_renewal_interval)
    }

    pub fn lease_renewal_interval(&self) -> Duration {
        self.lease_renewal_interval
    }

    /// Destroy every bean and module; later calls are no-ops
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = self.renewal.lock().take() {
            task.abort();
        }
        self.factory.destroy();
        self.modules.destroy();
        info!("Destroyed bean context");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::illegal_state("Bean context has been destroyed"));
        }
        Ok(())
    }
}

fn wait_until_bound(bean: &Bean, deadline: Option<Instant>) -> Result<()> {
    let Some(stateful) = bean.stateful() else {
        return Ok(());
    };
    match deadline {
        Some(deadline) => {
            stateful.wait_until_bound(deadline.saturating_duration_since(Instant::now()))
        }
        None => stateful.wait_until_bound(Duration::MAX),
    }
}

impl Drop for BeanContext {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for BeanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanContext")
            .field("factory", &self.factory)
            .field("modules", &self.modules)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
