//! Per-bean settings
//!
//! A setting for a bean resolves, in order, from the configuration under its
//! per-bean name, from the default override its provider declared, and from the
//! setting's own default.

use beanwire_domain::settings::{BooleanBeanSetting, IntBeanSetting, LongBeanSetting};
use beanwire_domain::{BeanDefaults, BeanKey};
use dashmap::DashMap;

use super::dynamic::{
    DynamicBooleanProperty, DynamicConfig, DynamicIntProperty, DynamicLongProperty, parse_bool,
    parse_int, parse_long,
};

/// Settings of every bean in a context
#[derive(Debug, Default)]
pub struct BeanConfigurations {
    config: DynamicConfig,
    defaults: DashMap<BeanKey, BeanDefaults>,
}

impl BeanConfigurations {
    pub fn new(config: DynamicConfig) -> Self {
        Self {
            config,
            defaults: DashMap::new(),
        }
    }

    /// Record the provider-declared defaults of `key`
    pub fn set_default_bean_config(&self, key: BeanKey, defaults: BeanDefaults) {
        if !defaults.is_empty() {
            self.defaults.insert(key, defaults);
        }
    }

    /// Settings view of one bean
    pub fn bean_configuration(&self, key: &BeanKey) -> BeanConfiguration {
        BeanConfiguration {
            key: key.clone(),
            config: self.config.clone(),
            defaults: self
                .defaults
                .get(key)
                .map(|defaults| defaults.value().clone())
                .unwrap_or_default(),
        }
    }

    pub fn config(&self) -> &DynamicConfig {
        &self.config
    }
}

/// Settings of one bean
#[derive(Debug, Clone)]
pub struct BeanConfiguration {
    key: BeanKey,
    config: DynamicConfig,
    defaults: BeanDefaults,
}

impl BeanConfiguration {
    pub fn key(&self) -> &BeanKey {
        &self.key
    }

    /// Live boolean setting
    pub fn get_bool(&self, setting: &BooleanBeanSetting) -> DynamicBooleanProperty {
        let default = self
            .defaults
            .get(setting.name())
            .and_then(parse_bool)
            .unwrap_or(setting.default_value());
        self.config
            .bool_property(setting.resolve_name(&self.key), default)
    }

    /// Live integer setting
    pub fn get_int(&self, setting: &IntBeanSetting) -> DynamicIntProperty {
        let default = self
            .defaults
            .get(setting.name())
            .and_then(parse_int)
            .unwrap_or(setting.default_value());
        self.config
            .int_property(setting.resolve_name(&self.key), default)
    }

    /// Live long setting
    pub fn get_long(&self, setting: &LongBeanSetting) -> DynamicLongProperty {
        let default = self
            .defaults
            .get(setting.name())
            .and_then(parse_long)
            .unwrap_or(setting.default_value());
        self.config
            .long_property(setting.resolve_name(&self.key), default)
    }
}
