//! Type-erased bean instances

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

/// Init/destroy hooks for a lifecycle-managed bean
///
/// `init` runs once before the instance is published to the cache; a failure
/// aborts creation. `destroy` runs once when the instance is evicted or the
/// owning context shuts down; failures are logged and swallowed.
pub trait Lifecycle: Send + Sync {
    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn destroy(&self) -> Result<()> {
        Ok(())
    }
}

/// A bean whose remote binding may not be ready yet
pub trait StatefulBean: Send + Sync {
    /// Whether the bean is currently bound
    fn is_bound(&self) -> bool;

    /// Block the calling thread until bound, failing with a timeout error once
    /// `timeout` elapses
    fn wait_until_bound(&self, timeout: Duration) -> Result<()>;
}

/// A created bean: a shared instance of some type plus its optional capabilities
///
/// The instance is stored as an `Arc<T>`, where `T` may be unsized (for example
/// `dyn Service`), so consumers downcast with the same `T` the producer used.
#[derive(Clone)]
pub struct Bean {
    value: Arc<dyn Any + Send + Sync>,
    address: usize,
    type_name: &'static str,
    lifecycle: Option<Arc<dyn Lifecycle>>,
    stateful: Option<Arc<dyn StatefulBean>>,
}

impl Bean {
    /// Wrap a shared instance
    pub fn new<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> Self {
        let address = Arc::as_ptr(&instance).cast::<()>() as usize;
        Self {
            value: Arc::new(instance),
            address,
            type_name: std::any::type_name::<T>(),
            lifecycle: None,
            stateful: None,
        }
    }

    /// Wrap an instance that manages its own lifecycle
    pub fn managed<T: Lifecycle + 'static>(instance: Arc<T>) -> Self {
        let lifecycle: Arc<dyn Lifecycle> = instance.clone();
        Self::new(instance).with_lifecycle(lifecycle)
    }

    /// Attach lifecycle hooks
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Arc<dyn Lifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    /// Attach the stateful capability
    #[must_use]
    pub fn with_stateful(mut self, stateful: Arc<dyn StatefulBean>) -> Self {
        self.stateful = Some(stateful);
        self
    }

    /// Same instance with lifecycle hooks removed
    #[must_use]
    pub fn without_lifecycle(mut self) -> Self {
        self.lifecycle = None;
        self
    }

    /// Recover the instance as `Arc<T>`
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Name of the type the bean was created as
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn lifecycle(&self) -> Option<&Arc<dyn Lifecycle>> {
        self.lifecycle.as_ref()
    }

    pub fn stateful(&self) -> Option<&Arc<dyn StatefulBean>> {
        self.stateful.as_ref()
    }

    /// Whether both beans wrap the same underlying instance
    pub fn same_instance(&self, other: &Bean) -> bool {
        self.address == other.address
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("type", &self.type_name)
            .field("lifecycled", &self.lifecycle.is_some())
            .field("stateful", &self.stateful.is_some())
            .finish()
    }
}
