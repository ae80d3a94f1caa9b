//! Composition root
//!
//! ```text
//! ApiProviders ─┐
//! Modules ──────┼─> ContextConfigurer::configure() ─> BeanContext
//! Components ───┤                                      ├── BeanFactory (context registry)
//! Config ───────┘                                      ├── ModuleManager (module injectors)
//!                                                      └── ServiceLeaseManager
//! ```

pub mod configurer;
pub mod context;

pub use configurer::ContextConfigurer;
pub use context::BeanContext;
