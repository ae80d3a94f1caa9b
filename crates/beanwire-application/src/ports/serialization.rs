//! Versioned serialization ports

use std::sync::Arc;

use beanwire_domain::{ObjectSerializerDefinition, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Converts payloads to and from their wire form at a given version
pub trait ObjectSerializer: Send + Sync {
    /// Wire form of `value` as understood by a peer at `version`
    fn serialize(&self, value: Value, version: u32) -> Result<Value>;

    /// Value at the current version from a wire form written at `version`
    fn deserialize(&self, wire: Value, version: u32) -> Result<Value>;
}

/// Creates serializers for versioned service definitions
pub trait ObjectSerializerFactory: Send + Sync {
    fn create(&self, definition: &ObjectSerializerDefinition) -> Result<Arc<dyn ObjectSerializer>>;
}

/// Typed front-end over an [`ObjectSerializer`] at a fixed version
#[derive(Clone)]
pub struct VersionedCodec {
    serializer: Arc<dyn ObjectSerializer>,
    version: u32,
}

impl VersionedCodec {
    pub fn new(serializer: Arc<dyn ObjectSerializer>, version: u32) -> Self {
        Self {
            serializer,
            version,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Value> {
        self.serializer
            .serialize(serde_json::to_value(value)?, self.version)
    }

    pub fn decode<T: DeserializeOwned>(&self, wire: Value) -> Result<T> {
        let value = self.serializer.deserialize(wire, self.version)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Move `value` through its wire form and back
    pub fn round_trip<T: Serialize + DeserializeOwned>(&self, value: &T) -> Result<T> {
        self.decode(self.encode(value)?)
    }
}
