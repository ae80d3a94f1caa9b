//! Bean creation core
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`key_lock`] | Striped per-key reentrant lock |
//! | [`object_cache`] | At-most-once creation cache with lifecycle hooks |
//! | [`registry`] | Key to factory bean registry |
//! | [`factory`] | Resolving bean factory with cycle detection |
//! | [`factory_beans`] | Instance, closure and constructor factory beans |

pub mod factory;
pub mod factory_beans;
pub mod key_lock;
pub mod object_cache;
pub mod registry;

pub use factory::BeanFactory;
pub use factory_beans::{ConstructorFactoryBean, FnFactoryBean, InstanceFactoryBean};
pub use key_lock::{KeyLock, KeyLockGuard};
pub use object_cache::ObjectCache;
pub use registry::BeanRegistry;
