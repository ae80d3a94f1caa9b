//! Per-bean setting descriptors
//!
//! A setting is resolved per bean under the name
//! `beanwire.bean.<beanType>[.<qualifier>].<settingName>`, so that one
//! configuration source can tune every bean individually.

use std::collections::BTreeMap;

use crate::bean::BeanKey;
use crate::constants::{
    BEAN_SETTING_PREFIX, DEFAULT_FAULT_TOLERANCE_TIMEOUT_MS, FAULT_TOLERANCE_ENABLED_SETTING,
    FAULT_TOLERANCE_TIMEOUT_SETTING,
};

/// A named, typed setting with a default value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeanSetting<T> {
    name: &'static str,
    default: T,
}

pub type BooleanBeanSetting = BeanSetting<bool>;
pub type IntBeanSetting = BeanSetting<i32>;
pub type LongBeanSetting = BeanSetting<i64>;

impl<T> BeanSetting<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full configuration name of this setting for `key`
    pub fn resolve_name(&self, key: &BeanKey) -> String {
        match key.qualifier() {
            Some(qualifier) => format!(
                "{BEAN_SETTING_PREFIX}.{}.{qualifier}.{}",
                key.bean_type().name(),
                self.name
            ),
            None => format!("{BEAN_SETTING_PREFIX}.{}.{}", key.bean_type().name(), self.name),
        }
    }
}

impl<T: Copy> BeanSetting<T> {
    pub fn default_value(&self) -> T {
        self.default
    }
}

/// Whether calls on a bean run through the fault-tolerance policy
pub const FAULT_TOLERANCE_ENABLED: BooleanBeanSetting =
    BeanSetting::new(FAULT_TOLERANCE_ENABLED_SETTING, true);

/// Call timeout in milliseconds applied by the fault-tolerance policy
pub const INITIAL_TIMEOUT: IntBeanSetting =
    BeanSetting::new(FAULT_TOLERANCE_TIMEOUT_SETTING, DEFAULT_FAULT_TOLERANCE_TIMEOUT_MS);

/// Default overrides a provider declares for the beans it publishes
///
/// Values are kept in their string form and parsed with the same rules as
/// any other configuration value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeanDefaults {
    values: BTreeMap<&'static str, String>,
}

impl BeanDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bool(mut self, setting: &BooleanBeanSetting, value: bool) -> Self {
        self.values.insert(setting.name(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_int(mut self, setting: &IntBeanSetting, value: i32) -> Self {
        self.values.insert(setting.name(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_long(mut self, setting: &LongBeanSetting, value: i64) -> Self {
        self.values.insert(setting.name(), value.to_string());
        self
    }

    /// Override for the setting called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
