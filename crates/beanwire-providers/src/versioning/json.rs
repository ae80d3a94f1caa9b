//! JSON versioning plugin
//!
//! Payloads travel in an envelope `{"version": n, "payload": ...}`. A peer at
//! an older version receives payloads downgraded through the registered
//! migrations, and payloads written at an older version are upgraded to the
//! current one when read.

use std::sync::Arc;

use beanwire_application::ports::serialization::{ObjectSerializer, ObjectSerializerFactory};
use beanwire_domain::{Error, ObjectSerializerDefinition, Result};
use dashmap::DashMap;
use serde_json::{Value, json};

use crate::constants::{ENVELOPE_PAYLOAD_FIELD, ENVELOPE_VERSION_FIELD};

/// Converts a payload between `from_version` and `from_version + 1`
pub trait JsonMigration: Send + Sync {
    fn from_version(&self) -> u32;

    fn upgrade(&self, value: Value) -> Result<Value>;

    fn downgrade(&self, value: Value) -> Result<Value>;
}

/// Serializer factory holding the migrations of each configurer
#[derive(Default)]
pub struct JsonVersioningPlugin {
    configurers: DashMap<String, Arc<Vec<Arc<dyn JsonMigration>>>>,
}

impl JsonVersioningPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the migrations used by services naming `configurer`
    pub fn register_configurer(
        &self,
        configurer: impl Into<String>,
        mut migrations: Vec<Arc<dyn JsonMigration>>,
    ) {
        migrations.sort_by_key(|migration| migration.from_version());
        self.configurers.insert(configurer.into(), Arc::new(migrations));
    }

    #[must_use]
    pub fn with_configurer(
        self,
        configurer: impl Into<String>,
        migrations: Vec<Arc<dyn JsonMigration>>,
    ) -> Self {
        self.register_configurer(configurer, migrations);
        self
    }
}

impl ObjectSerializerFactory for JsonVersioningPlugin {
    fn create(&self, definition: &ObjectSerializerDefinition) -> Result<Arc<dyn ObjectSerializer>> {
        let Some(configurer) = definition.configurer() else {
            return Ok(Arc::new(JsonObjectSerializer::new(
                definition.version(),
                Arc::new(Vec::new()),
            )));
        };
        let migrations = self
            .configurers
            .get(configurer)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                let mut available: Vec<String> =
                    self.configurers.iter().map(|e| e.key().clone()).collect();
                available.sort();
                Error::configuration(format!(
                    "Unknown serializer configurer '{configurer}'. Available configurers: {available:?}"
                ))
            })?;
        Ok(Arc::new(JsonObjectSerializer::new(
            definition.version(),
            migrations,
        )))
    }
}

/// Envelope serializer for one service at its current version
pub struct JsonObjectSerializer {
    current_version: u32,
    migrations: Arc<Vec<Arc<dyn JsonMigration>>>,
}

impl JsonObjectSerializer {
    pub fn new(current_version: u32, migrations: Arc<Vec<Arc<dyn JsonMigration>>>) -> Self {
        Self {
            current_version,
            migrations,
        }
    }

    fn between(&self, from: u32) -> impl DoubleEndedIterator<Item = &Arc<dyn JsonMigration>> {
        let current = self.current_version;
        self.migrations
            .iter()
            .filter(move |m| m.from_version() >= from && m.from_version() < current)
    }
}

impl ObjectSerializer for JsonObjectSerializer {
    fn serialize(&self, value: Value, version: u32) -> Result<Value> {
        if version > self.current_version {
            return Err(Error::configuration(format!(
                "Cannot write version {version} payloads with a serializer at version {}",
                self.current_version
            )));
        }
        let mut payload = value;
        for migration in self.between(version).rev() {
            payload = migration.downgrade(payload)?;
        }
        Ok(json!({
            ENVELOPE_VERSION_FIELD: version,
            ENVELOPE_PAYLOAD_FIELD: payload,
        }))
    }

    fn deserialize(&self, wire: Value, _version: u32) -> Result<Value> {
        let Value::Object(mut envelope) = wire else {
            return Err(Error::internal("Versioned payload is not an envelope object"));
        };
        let written_at = envelope
            .get(ENVELOPE_VERSION_FIELD)
            .and_then(Value::as_u64)
            .and_then(|version| u32::try_from(version).ok())
            .ok_or_else(|| Error::internal("Versioned payload has no valid version"))?;
        let mut payload = envelope
            .remove(ENVELOPE_PAYLOAD_FIELD)
            .unwrap_or(Value::Null);
        for migration in self.between(written_at) {
            payload = migration.upgrade(payload)?;
        }
        Ok(payload)
    }
}
