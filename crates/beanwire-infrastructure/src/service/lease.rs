//! Service lease renewal

use std::sync::{Arc, Weak};
use std::time::Duration;

use beanwire_domain::{Error, Result};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::instance::ServiceBeanInstance;

/// Renews the bindings of every live service bean
#[derive(Debug, Default)]
pub struct ServiceLeaseManager {
    instances: Mutex<Vec<Weak<ServiceBeanInstance>>>,
}

impl ServiceLeaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, instance: &Arc<ServiceBeanInstance>) {
        self.instances.lock().push(Arc::downgrade(instance));
    }

    /// Service beans still alive
    pub fn tracked(&self) -> usize {
        self.live().len()
    }

    fn live(&self) -> Vec<Arc<ServiceBeanInstance>> {
        let mut instances = self.instances.lock();
        instances.retain(|instance| instance.strong_count() > 0);
        instances.iter().filter_map(Weak::upgrade).collect()
    }

    /// Renew every lease once, returning how many beans were (re)bound
    ///
    /// Failures are logged; one bean failing does not stop the others.
    pub fn renew_leases(&self) -> usize {
        let mut rebound = 0;
        for instance in self.live() {
            match instance.renew_lease() {
                Ok(true) => rebound += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(bean_key = %instance.key(), error = %err, "Failed to renew service lease");
                }
            }
        }
        rebound
    }

    /// Renew leases every `interval` on the current tokio runtime
    ///
    /// Renewal runs on a blocking thread since binding is synchronous. The task
    /// stops once the manager is dropped.
    pub fn start(self: &Arc<Self>, interval: Duration) -> Result<JoinHandle<()>> {
        if interval.is_zero() {
            return Err(Error::configuration("Lease renewal interval cannot be 0"));
        }
        let handle = Handle::try_current().map_err(|err| {
            Error::configuration_with_source("Lease renewal needs a tokio runtime", err)
        })?;
        let manager = Arc::downgrade(self);
        Ok(handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                match tokio::task::spawn_blocking(move || manager.renew_leases()).await {
                    Ok(0) => {}
                    Ok(rebound) => debug!(rebound, "Renewed service leases"),
                    Err(err) => warn!(error = %err, "Lease renewal task failed"),
                }
            }
        }))
    }
}
