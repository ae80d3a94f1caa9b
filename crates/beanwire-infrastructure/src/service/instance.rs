//! Stateful service bean instances
//!
//! A [`ServiceBeanInstance`] owns the current binding of one service bean. The
//! proxy handed to consumers looks the binding up on every call, so a bean can
//! be created before its service is discovered and become usable later.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use beanwire_application::ports::{BoundServiceBeanInstance, ServiceDiscovery, VersionedCodec};
use beanwire_application::publish::ServiceDefinition;
use beanwire_application::registry::ServiceComponentRegistry;
use beanwire_domain::{Bean, BeanKey, Error, Lifecycle, Result, ServiceProperties, StatefulBean};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use super::decorator::ServiceBeanDecorator;

struct Binding {
    bean: Bean,
    instance: BoundServiceBeanInstance,
    properties: ServiceProperties,
}

enum BindingState {
    Unbound { reason: String },
    Bound(Binding),
    Released,
}

/// Current binding of one service bean
pub struct ServiceBeanInstance {
    definition: ServiceDefinition,
    discovery: Arc<dyn ServiceDiscovery>,
    components: Arc<ServiceComponentRegistry>,
    decorator: Arc<ServiceBeanDecorator>,
    codec: Option<VersionedCodec>,
    state: Mutex<BindingState>,
    bound: Condvar,
}

impl ServiceBeanInstance {
    /// Unbound instance for `definition`
    ///
    /// Fails with a configuration error if the definition is versioned with an
    /// unknown serializer configurer.
    pub fn new(
        definition: ServiceDefinition,
        discovery: Arc<dyn ServiceDiscovery>,
        components: Arc<ServiceComponentRegistry>,
        decorator: Arc<ServiceBeanDecorator>,
    ) -> Result<Self> {
        let codec = decorator.codec_for(&definition)?;
        Ok(Self {
            definition,
            discovery,
            components,
            decorator,
            codec,
            state: Mutex::new(BindingState::Unbound {
                reason: String::from("not bound yet"),
            }),
            bound: Condvar::new(),
        })
    }

    pub fn key(&self) -> &BeanKey {
        self.definition.bean_key()
    }

    pub fn definition(&self) -> &ServiceDefinition {
        &self.definition
    }

    /// Discover the service and bind it
    ///
    /// Fails with a binding error if discovery finds nothing, and with a
    /// configuration error if the properties name no known component.
    pub fn bind(&self) -> Result<()> {
        match self.discovery.discover(self.key()) {
            Ok(Some(properties)) => self.bind_to(properties),
            Ok(None) => {
                let err = Error::binding(format!(
                    "No provider of {} found by {}",
                    self.key(),
                    self.discovery.describe()
                ));
                self.mark_unbound(&err);
                Err(err)
            }
            Err(err) => {
                self.mark_unbound(&err);
                Err(err)
            }
        }
    }

    /// Bind to a provider described by `properties`, replacing any current binding
    pub fn bind_to(&self, properties: ServiceProperties) -> Result<()> {
        let key = self.key();
        let component_name = properties
            .component_name()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Service properties {properties} for {key} name no service component"
                ))
            })?;
        let component = self.components.get(&component_name)?;
        if !component.can_bind_type(key.bean_type()) {
            return Err(Error::configuration(format!(
                "Service component '{component_name}' cannot bind {key}"
            )));
        }

        let instance = component.bind(&self.definition, &properties).inspect_err(|err| {
            self.mark_unbound(err);
        })?;
        let bean = match self
            .decorator
            .decorate(&self.definition, self.codec.as_ref(), instance.bean().clone())
        {
            Ok(bean) => bean,
            Err(err) => {
                instance.release();
                return Err(err);
            }
        };

        let previous = {
            let mut state = self.state.lock();
            if matches!(*state, BindingState::Released) {
                drop(state);
                instance.release();
                return Err(Error::illegal_state(format!(
                    "{key} was destroyed while binding"
                )));
            }
            std::mem::replace(
                &mut *state,
                BindingState::Bound(Binding {
                    bean,
                    instance,
                    properties,
                }),
            )
        };
        self.bound.notify_all();

        if let BindingState::Bound(previous) = previous {
            previous.instance.release();
            info!(bean_key = %key, component = %component_name, "Rebound service bean");
        } else {
            debug!(bean_key = %key, component = %component_name, "Bound service bean");
        }
        Ok(())
    }

    fn mark_unbound(&self, err: &Error) {
        let mut state = self.state.lock();
        if let BindingState::Unbound { reason } = &mut *state {
            *reason = err.to_string();
        }
    }

    /// Currently bound, decorated proxy
    pub fn current(&self) -> Result<Bean> {
        match &*self.state.lock() {
            BindingState::Bound(binding) => Ok(binding.bean.clone()),
            BindingState::Unbound { reason } => Err(Error::service_unavailable(format!(
                "{} is not bound: {reason}",
                self.key()
            ))),
            BindingState::Released => Err(Error::service_unavailable(format!(
                "{} has been destroyed",
                self.key()
            ))),
        }
    }

    /// Properties of the current binding
    pub fn properties(&self) -> Option<ServiceProperties> {
        match &*self.state.lock() {
            BindingState::Bound(binding) => Some(binding.properties.clone()),
            _ => None,
        }
    }

    /// Re-run discovery and rebind if the provider changed
    ///
    /// Returns whether a new binding was made. A bound bean keeps its binding
    /// while discovery finds nothing.
    pub fn renew_lease(&self) -> Result<bool> {
        if self.is_released() {
            return Ok(false);
        }
        let Some(properties) = self.discovery.discover(self.key())? else {
            return Ok(false);
        };
        if self.properties().as_ref() == Some(&properties) {
            return Ok(false);
        }
        self.bind_to(properties).map(|()| true)
    }

    pub fn is_released(&self) -> bool {
        matches!(*self.state.lock(), BindingState::Released)
    }
}

impl StatefulBean for ServiceBeanInstance {
    fn is_bound(&self) -> bool {
        matches!(*self.state.lock(), BindingState::Bound(_))
    }

    fn wait_until_bound(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        loop {
            match &*state {
                BindingState::Bound(_) => return Ok(()),
                BindingState::Released => {
                    return Err(Error::service_unavailable(format!(
                        "{} was destroyed before it was bound",
                        self.key()
                    )));
                }
                BindingState::Unbound { reason } => {
                    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                        return Err(Error::timeout(format!(
                            "{} was not bound within {timeout:?}: {reason}",
                            self.key()
                        )));
                    }
                }
            }
            match deadline {
                Some(deadline) => {
                    self.bound.wait_until(&mut state, deadline);
                }
                None => self.bound.wait(&mut state),
            }
        }
    }
}

impl Lifecycle for ServiceBeanInstance {
    fn destroy(&self) -> Result<()> {
        let previous = std::mem::replace(&mut *self.state.lock(), BindingState::Released);
        self.bound.notify_all();
        if let BindingState::Bound(binding) = previous {
            binding.instance.release();
            debug!(bean_key = %self.key(), "Released service bean");
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceBeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.lock() {
            BindingState::Unbound { .. } => "unbound",
            BindingState::Bound(_) => "bound",
            BindingState::Released => "released",
        };
        f.debug_struct("ServiceBeanInstance")
            .field("key", self.key())
            .field("state", &state)
            .finish()
    }
}
