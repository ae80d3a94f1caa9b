//! Bean identity, instances and the creation context

pub mod context;
pub mod instance;
pub mod key;

pub use context::{Component, CreationContext, ResolutionChain};
pub use instance::{Bean, Lifecycle, StatefulBean};
pub use key::{BeanKey, BeanType, Constructor};
