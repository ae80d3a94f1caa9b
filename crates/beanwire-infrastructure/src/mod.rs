//! # Infrastructure Layer
//!
//! The bean runtime itself: creation, caching, modules, configuration and the
//! service binding layer, plus the composition root that wires them together.
//!
//! ## Module Categories
//!
//! ### Bean Runtime
//! | Module | Description |
//! |--------|-------------|
//! | [`beans`] | Key lock, object cache, registry and resolving bean factory |
//! | [`modules`] | Modules with private injectors and an export index |
//!
//! ### Services
//! | Module | Description |
//! |--------|-------------|
//! | [`service`] | Binding, decoration, discovery, exporting and lease renewal |
//!
//! ### Configuration & DI
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Dynamic configuration, bean settings and the figment loader |
//! | [`di`] | `ContextConfigurer` and `BeanContext` |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod beans;
pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;
pub mod modules;
pub mod service;

pub use beans::{BeanFactory, BeanRegistry, KeyLock, ObjectCache};
pub use config::{ConfigLoader, DynamicConfig, MapConfigSource, RuntimeConfig};
pub use di::{BeanContext, ContextConfigurer};
pub use error_ext::ErrorContext;
pub use modules::{Module, ModuleContext, ModuleManager};
