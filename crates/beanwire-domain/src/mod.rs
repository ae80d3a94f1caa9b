//! # Domain Layer
//!
//! Core types shared by every beanwire layer: bean identity, type-erased bean
//! instances, the creation context factories resolve their dependencies through,
//! service properties and the error type.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bean`] | `BeanType`, `BeanKey`, `Bean`, lifecycle traits, creation context |
//! | [`service`] | Service properties and serializer descriptors |
//! | [`settings`] | Per-bean setting descriptors and default overrides |
//! | [`error`] | Error kinds and `Result` alias |
//! | [`constants`] | Well-known names and defaults |

pub mod bean;
pub mod constants;
pub mod error;
pub mod service;
pub mod settings;

pub use bean::{
    Bean, BeanKey, BeanType, Component, CreationContext, Lifecycle, ResolutionChain, StatefulBean,
};
pub use error::{Error, Result};
pub use service::{ObjectSerializerDefinition, ServiceProperties};
pub use settings::{BeanDefaults, BeanSetting, BooleanBeanSetting, IntBeanSetting, LongBeanSetting};
