//! Module system
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`module`] | `Module` contract and `ModuleContext` declarations |
//! | [`manager`] | `ModuleManager` and the export index |
//! | `registry` | Per-module injector resolving bindings, imports and components |

pub mod manager;
pub mod module;
mod registry;

pub use manager::{ModuleInstance, ModuleManager};
pub use module::{Module, ModuleContext};
