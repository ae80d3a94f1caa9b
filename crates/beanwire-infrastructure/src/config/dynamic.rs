//! Live, layered configuration
//!
//! A [`DynamicConfig`] consults its sources in priority order on every read,
//! so values changed in a mutable source are visible immediately. A value that
//! does not parse as the requested type is treated as absent in that source and
//! the lookup falls through to the next one.

use std::fmt;
use std::sync::Arc;

use beanwire_application::ports::ConfigSource;

/// Parses the string form of a configuration value
pub type ParseFn<T> = fn(&str) -> Option<T>;

/// Ordered configuration sources, first match wins
#[derive(Clone, Default)]
pub struct DynamicConfig {
    sources: Arc<Vec<Arc<dyn ConfigSource>>>,
}

impl DynamicConfig {
    /// Config over `sources`, highest priority first
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        Self {
            sources: Arc::new(sources),
        }
    }

    /// Config consulting every source of `first` before those of `second`
    pub fn merged(first: &DynamicConfig, second: &DynamicConfig) -> Self {
        let sources = first
            .sources
            .iter()
            .chain(second.sources.iter())
            .cloned()
            .collect();
        Self::new(sources)
    }

    /// Same sources plus `source` at the lowest priority
    #[must_use]
    pub fn with_source(&self, source: Arc<dyn ConfigSource>) -> Self {
        let mut sources: Vec<_> = self.sources.iter().cloned().collect();
        sources.push(source);
        Self::new(sources)
    }

    /// First value of `name` that `parse` accepts
    pub fn lookup<T>(&self, name: &str, parse: ParseFn<T>) -> Option<T> {
        self.sources
            .iter()
            .filter_map(|source| source.get(name))
            .find_map(|raw| parse(&raw))
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.lookup(name, parse_string)
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.lookup(name, parse_bool).unwrap_or(default)
    }

    pub fn get_int(&self, name: &str, default: i32) -> i32 {
        self.lookup(name, parse_int).unwrap_or(default)
    }

    pub fn get_long(&self, name: &str, default: i64) -> i64 {
        self.lookup(name, parse_long).unwrap_or(default)
    }

    /// Live handle on a boolean value
    pub fn bool_property(&self, name: impl Into<String>, default: bool) -> DynamicBooleanProperty {
        DynamicProperty::new(self.clone(), name, default, parse_bool)
    }

    /// Live handle on an integer value
    pub fn int_property(&self, name: impl Into<String>, default: i32) -> DynamicIntProperty {
        DynamicProperty::new(self.clone(), name, default, parse_int)
    }

    /// Live handle on a long value
    pub fn long_property(&self, name: impl Into<String>, default: i64) -> DynamicLongProperty {
        DynamicProperty::new(self.clone(), name, default, parse_long)
    }

    /// Live handle on a string value
    pub fn string_property(
        &self,
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> DynamicStringProperty {
        DynamicProperty::new(self.clone(), name, default.into(), parse_string)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl fmt::Debug for DynamicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicConfig")
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[allow(clippy::unnecessary_wraps)]
fn parse_string(raw: &str) -> Option<String> {
    Some(raw.to_string())
}

/// Accepts only `true` or `false`, ignoring case
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn parse_int(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

pub fn parse_long(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// A configuration value read afresh on every access
#[derive(Clone)]
pub struct DynamicProperty<T> {
    config: DynamicConfig,
    name: String,
    default: T,
    parse: ParseFn<T>,
}

pub type DynamicBooleanProperty = DynamicProperty<bool>;
pub type DynamicIntProperty = DynamicProperty<i32>;
pub type DynamicLongProperty = DynamicProperty<i64>;
pub type DynamicStringProperty = DynamicProperty<String>;

impl<T: Clone> DynamicProperty<T> {
    pub fn new(config: DynamicConfig, name: impl Into<String>, default: T, parse: ParseFn<T>) -> Self {
        Self {
            config,
            name: name.into(),
            default,
            parse,
        }
    }

    /// Current value, or the default when no source provides a valid one
    pub fn get(&self) -> T {
        self.config
            .lookup(&self.name, self.parse)
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicProperty")
            .field("name", &self.name)
            .field("default", &self.default)
            .finish()
    }
}
