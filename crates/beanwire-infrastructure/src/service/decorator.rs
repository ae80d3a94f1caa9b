//! Service bean decoration
//!
//! A bound proxy is wrapped with the versioning codec first and the
//! fault-tolerance guard second, so the guard covers the whole call path
//! including (de)serialization.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use beanwire_application::ports::{
    FaultToleranceGuard, FaultTolerancePolicy, ObjectSerializerFactory, VersionedCodec,
};
use beanwire_application::proxy::Interceptor;
use beanwire_application::publish::ServiceDefinition;
use beanwire_domain::settings::{FAULT_TOLERANCE_ENABLED, INITIAL_TIMEOUT};
use beanwire_domain::{Bean, BeanKey, Result};

use crate::config::BeanConfigurations;

/// Builds fault-tolerance guards from each bean's settings
pub struct BeanFaultToleranceFactory {
    policy: Arc<dyn FaultTolerancePolicy>,
    configurations: Arc<BeanConfigurations>,
}

impl BeanFaultToleranceFactory {
    pub fn new(
        policy: Arc<dyn FaultTolerancePolicy>,
        configurations: Arc<BeanConfigurations>,
    ) -> Self {
        Self {
            policy,
            configurations,
        }
    }

    /// Guard for the bean `key`
    ///
    /// The guard reads `faultTolerance.enabled` and `faultTolerance.timeout` on
    /// every call; while disabled, calls bypass the policy.
    pub fn guard_for(&self, key: &BeanKey) -> Arc<dyn Interceptor> {
        let configuration = self.configurations.bean_configuration(key);
        let timeout = configuration.get_int(&INITIAL_TIMEOUT);
        let enabled = configuration.get_bool(&FAULT_TOLERANCE_ENABLED);
        Arc::new(
            FaultToleranceGuard::new(Arc::clone(&self.policy), key.to_string(), move || {
                Duration::from_millis(u64::try_from(timeout.get()).unwrap_or_default())
            })
            .enabled_when(move || enabled.get()),
        )
    }

    /// Whether calls on `key` currently run through the policy
    pub fn is_enabled(&self, key: &BeanKey) -> bool {
        self.configurations
            .bean_configuration(key)
            .get_bool(&FAULT_TOLERANCE_ENABLED)
            .get()
    }

    pub fn policy(&self) -> &Arc<dyn FaultTolerancePolicy> {
        &self.policy
    }
}

impl fmt::Debug for BeanFaultToleranceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanFaultToleranceFactory")
            .field("policy", &self.policy.name())
            .finish()
    }
}

/// Applies versioning and fault tolerance to bound service proxies
pub struct ServiceBeanDecorator {
    serializers: Arc<dyn ObjectSerializerFactory>,
    fault_tolerance: Arc<BeanFaultToleranceFactory>,
}

impl ServiceBeanDecorator {
    pub fn new(
        serializers: Arc<dyn ObjectSerializerFactory>,
        fault_tolerance: Arc<BeanFaultToleranceFactory>,
    ) -> Self {
        Self {
            serializers,
            fault_tolerance,
        }
    }

    /// Codec for a versioned definition, `None` otherwise
    ///
    /// Fails with a configuration error if the serializer configurer is unknown.
    pub fn codec_for(&self, definition: &ServiceDefinition) -> Result<Option<VersionedCodec>> {
        if !definition.is_versioned() {
            return Ok(None);
        }
        let serializer = self.serializers.create(definition.serializer())?;
        Ok(Some(VersionedCodec::new(
            serializer,
            definition.serializer().version(),
        )))
    }

    /// Wrap a bound proxy: versioning innermost, fault tolerance outermost
    pub fn decorate(
        &self,
        definition: &ServiceDefinition,
        codec: Option<&VersionedCodec>,
        bean: Bean,
    ) -> Result<Bean> {
        let bean = match codec {
            Some(codec) => definition.decorate_versioned(bean, codec.clone())?,
            None => bean,
        };
        definition.decorate_guarded(bean, self.fault_tolerance.guard_for(definition.bean_key()))
    }

    pub fn fault_tolerance(&self) -> &Arc<BeanFaultToleranceFactory> {
        &self.fault_tolerance
    }
}
