//! Configuration sources

use std::collections::HashMap;
use std::fmt;

use beanwire_application::ports::ConfigSource;
use figment::Figment;
use parking_lot::RwLock;

/// Mutable in-memory source, for programmatic settings and tests
#[derive(Debug, Default)]
pub struct MapConfigSource {
    values: RwLock<HashMap<String, String>>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.values.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl ConfigSource for MapConfigSource {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }
}

/// Snapshot of a figment, looked up by dotted path
///
/// Scalars are rendered to their string form; tables and arrays are absent.
pub struct FigmentConfigSource {
    figment: Figment,
}

impl FigmentConfigSource {
    pub fn new(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn figment(&self) -> &Figment {
        &self.figment
    }
}

impl ConfigSource for FigmentConfigSource {
    fn get(&self, name: &str) -> Option<String> {
        let value = self.figment.find_value(name).ok()?;
        if let Some(text) = value.as_str() {
            return Some(text.to_string());
        }
        if let Some(flag) = value.to_bool() {
            return Some(flag.to_string());
        }
        if let Some(number) = value.to_i128() {
            return Some(number.to_string());
        }
        value.to_f64().map(|number| number.to_string())
    }
}

impl fmt::Debug for FigmentConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigmentConfigSource").finish_non_exhaustive()
    }
}
