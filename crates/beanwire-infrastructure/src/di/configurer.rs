//! Context configurer
//!
//! Collects everything a bean context is made of and wires it together in
//! [`ContextConfigurer::configure`].

use std::sync::Arc;
use std::time::Duration;

use beanwire_application::ports::{
    BeanPostProcessor, ConfigSource, FaultTolerancePolicy, ObjectSerializerFactory,
    ServiceComponent,
};
use beanwire_application::publish::{ApiProvider, PublishedBean};
use beanwire_application::registry::ServiceComponentRegistry;
use beanwire_domain::BeanKey;
use beanwire_domain::error::Result;
use beanwire_domain::settings::{BooleanBeanSetting, IntBeanSetting, LongBeanSetting};
use beanwire_providers::{JsonVersioningPlugin, NoFaultTolerance, resolve_fault_tolerance_policy};
use tracing::info;

use super::context::BeanContext;
use crate::beans::{BeanFactory, BeanRegistry};
use crate::config::{BeanConfigurations, DynamicConfig, LoadedConfig, MapConfigSource};
use crate::constants::DEFAULT_LEASE_RENEWAL_INTERVAL_MS;
use crate::modules::{Module, ModuleManager};
use crate::service::{
    BeanFaultToleranceFactory, LibraryFactoryBean, ServiceBeanDecorator, ServiceBinder,
    ServiceFactoryBean, ServiceLeaseManager,
};

/// Builder of a [`BeanContext`]
pub struct ContextConfigurer {
    providers: Vec<ApiProvider>,
    modules: Vec<Arc<dyn Module>>,
    components: Vec<Arc<dyn ServiceComponent>>,
    sources: Vec<Arc<dyn ConfigSource>>,
    settings: Arc<MapConfigSource>,
    post_processors: Vec<Arc<dyn BeanPostProcessor>>,
    fault_tolerance: Arc<dyn FaultTolerancePolicy>,
    serializers: Arc<dyn ObjectSerializerFactory>,
    lease_renewal_interval: Duration,
}

impl Default for ContextConfigurer {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            modules: Vec::new(),
            components: Vec::new(),
            sources: Vec::new(),
            settings: Arc::new(MapConfigSource::new()),
            post_processors: Vec::new(),
            fault_tolerance: Arc::new(NoFaultTolerance),
            serializers: Arc::new(JsonVersioningPlugin::new()),
            lease_renewal_interval: Duration::from_millis(DEFAULT_LEASE_RENEWAL_INTERVAL_MS),
        }
    }
}

impl ContextConfigurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurer seeded from loaded configuration
    ///
    /// The loaded values become the lowest-priority configuration source. The
    /// fault-tolerance policy and lease renewal interval are the configured ones.
    pub fn from_loaded_config(loaded: LoadedConfig) -> Result<Self> {
        let policy = resolve_fault_tolerance_policy(&loaded.runtime.fault_tolerance)?;
        Ok(Self::new()
            .add_config_source(Arc::new(loaded.source))
            .with_fault_tolerance(policy)
            .with_lease_renewal_interval(loaded.runtime.services.lease_renewal_interval()))
    }

    #[must_use]
    pub fn register_api_provider(mut self, provider: ApiProvider) -> Self {
        self.providers.push(provider);
        self
    }

    #[must_use]
    pub fn register_module(mut self, module: Arc<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    #[must_use]
    pub fn register_component(mut self, component: Arc<dyn ServiceComponent>) -> Self {
        self.components.push(component);
        self
    }

    /// Add a configuration source below those already added
    ///
    /// Programmatic settings always take precedence over added sources.
    #[must_use]
    pub fn add_config_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Programmatic setting
    #[must_use]
    pub fn set(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.set(name, value);
        self
    }

    #[must_use]
    pub fn set_bean_setting_bool(self, key: &BeanKey, setting: &BooleanBeanSetting, value: bool) -> Self {
        self.set(setting.resolve_name(key), value.to_string())
    }

    #[must_use]
    pub fn set_bean_setting_int(self, key: &BeanKey, setting: &IntBeanSetting, value: i32) -> Self {
        self.set(setting.resolve_name(key), value.to_string())
    }

    #[must_use]
    pub fn set_bean_setting_long(self, key: &BeanKey, setting: &LongBeanSetting, value: i64) -> Self {
        self.set(setting.resolve_name(key), value.to_string())
    }

    /// Add a post-processor; post-processors run in registration order
    #[must_use]
    pub fn register_post_processor(mut self, processor: Arc<dyn BeanPostProcessor>) -> Self {
        self.post_processors.push(processor);
        self
    }

    #[must_use]
    pub fn with_fault_tolerance(mut self, policy: Arc<dyn FaultTolerancePolicy>) -> Self {
        self.fault_tolerance = policy;
        self
    }

    #[must_use]
    pub fn with_versioning(mut self, serializers: Arc<dyn ObjectSerializerFactory>) -> Self {
        self.serializers = serializers;
        self
    }

    /// Interval used by [`BeanContext::start_configured_lease_renewal`]
    #[must_use]
    pub fn with_lease_renewal_interval(mut self, interval: Duration) -> Self {
        self.lease_renewal_interval = interval;
        self
    }

    /// Build the context
    ///
    /// Fails on duplicate module names, duplicate component names and keys
    /// published twice. Nothing is created until it is first requested.
    pub fn configure(self) -> Result<BeanContext> {
        let settings: Arc<dyn ConfigSource> = self.settings;
        let mut sources = vec![settings];
        sources.extend(self.sources);
        let config = DynamicConfig::new(sources);

        let components = Arc::new(ServiceComponentRegistry::new());
        for component in self.components {
            components.register(component)?;
        }

        let modules = ModuleManager::new();
        for module in &self.modules {
            modules.register(module.as_ref())?;
        }

        let configurations = Arc::new(BeanConfigurations::new(config.clone()));
        let fault_tolerance = Arc::new(BeanFaultToleranceFactory::new(
            self.fault_tolerance,
            Arc::clone(&configurations),
        ));
        let binder = ServiceBinder {
            components: Arc::clone(&components),
            decorator: Arc::new(ServiceBeanDecorator::new(
                self.serializers,
                Arc::clone(&fault_tolerance),
            )),
            leases: Arc::new(ServiceLeaseManager::new()),
        };

        let registry = Arc::new(BeanRegistry::new());
        for export in modules.export_factory_beans() {
            registry.register(export)?;
        }
        for provider in &self.providers {
            for published in provider.beans() {
                configurations.set_default_bean_config(published.key().clone(), published.defaults().clone());
                match published {
                    PublishedBean::Library(library) => registry.register(Arc::new(
                        LibraryFactoryBean::new(library.clone(), Arc::clone(&fault_tolerance)),
                    ))?,
                    PublishedBean::Service(service) => registry.register(Arc::new(
                        ServiceFactoryBean::new(
                            service.definition().clone(),
                            Arc::clone(service.discovery()),
                            binder.clone(),
                        ),
                    ))?,
                }
            }
        }

        let factory = BeanFactory::new("context", registry);
        for processor in self.post_processors {
            factory.register_post_processor(processor);
        }

        info!(
            providers = self.providers.len(),
            modules = self.modules.len(),
            components = components.names().len(),
            "Configured bean context"
        );
        Ok(BeanContext::new(
            factory,
            modules,
            config,
            configurations,
            binder,
            self.lease_renewal_interval,
        ))
    }
}
