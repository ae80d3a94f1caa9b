//! Configuration
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dynamic`] | Layered live configuration and typed properties |
//! | [`sources`] | In-memory and figment-backed sources |
//! | [`bean_settings`] | Per-bean settings with provider defaults |
//! | [`loader`] | Figment loader for TOML files and environment variables |
//! | [`types`] | `RuntimeConfig` and its sections |

pub mod bean_settings;
pub mod dynamic;
pub mod loader;
pub mod sources;
pub mod types;

pub use bean_settings::{BeanConfiguration, BeanConfigurations};
pub use dynamic::{
    DynamicBooleanProperty, DynamicConfig, DynamicIntProperty, DynamicLongProperty,
    DynamicProperty, DynamicStringProperty,
};
pub use loader::{ConfigLoader, LoadedConfig};
pub use sources::{FigmentConfigSource, MapConfigSource};
pub use types::{LoggingConfig, RuntimeConfig, ServiceConfig};
