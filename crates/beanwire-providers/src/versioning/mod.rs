//! Versioned serialization plugins

pub mod json;

pub use json::{JsonMigration, JsonObjectSerializer, JsonVersioningPlugin};
