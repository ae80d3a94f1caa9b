//! Bean identity
//!
//! A [`BeanKey`] is the universal address of a bean: its type plus an optional
//! qualifier. The same key is used by factory registries, the object cache,
//! per-bean settings and module exports.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::context::{Component, CreationContext};
use super::instance::Bean;
use crate::error::Result;

/// Constructs a bean of a concrete type from a creation context
pub type Constructor = fn(&dyn CreationContext) -> Result<Bean>;

/// Runtime type token for a bean
///
/// Equality and hashing consider only the underlying [`TypeId`]. Concrete types
/// registered through [`BeanType::component`] additionally carry a constructor so
/// that module injectors can build them without an explicit binding.
#[derive(Clone, Copy)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
    constructor: Option<Constructor>,
}

impl BeanType {
    /// Type token for `T`, which may be a trait object such as `dyn Service`
    pub fn of<T: ?Sized + 'static>() -> Self {
        let name = std::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            name: name.strip_prefix("dyn ").unwrap_or(name),
            constructor: None,
        }
    }

    /// Type token for a concrete component that can be built by construction
    pub fn component<C: Component>() -> Self {
        Self {
            constructor: Some(construct_component::<C> as Constructor),
            ..Self::of::<C>()
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        let head_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..head_end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }

    /// Constructor for concrete component types
    pub fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }

    /// Whether this token identifies `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

fn construct_component<C: Component>(ctx: &dyn CreationContext) -> Result<Bean> {
    C::construct(ctx).map(|component| Arc::new(component).into_bean())
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Bean identity: a type plus an optional qualifier
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BeanKey {
    bean_type: BeanType,
    qualifier: Option<String>,
}

impl BeanKey {
    /// Create a key from a type and optional qualifier
    pub fn new(bean_type: BeanType, qualifier: Option<String>) -> Self {
        Self {
            bean_type,
            qualifier,
        }
    }

    /// Key without a qualifier
    pub fn unqualified(bean_type: BeanType) -> Self {
        Self::new(bean_type, None)
    }

    /// Unqualified key for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::unqualified(BeanType::of::<T>())
    }

    /// Qualified key for `T`
    pub fn qualified<T: ?Sized + 'static>(qualifier: impl Into<String>) -> Self {
        Self::new(BeanType::of::<T>(), Some(qualifier.into()))
    }

    /// Key for a concrete component type
    pub fn component<C: Component>() -> Self {
        Self::unqualified(BeanType::component::<C>())
    }

    /// The bean type
    pub fn bean_type(&self) -> &BeanType {
        &self.bean_type
    }

    /// The qualifier, if any
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Same type with a different qualifier
    pub fn with_qualifier(&self, qualifier: Option<String>) -> Self {
        Self::new(self.bean_type, qualifier)
    }
}

impl fmt::Debug for BeanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for BeanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}[{}]", self.bean_type, qualifier),
            None => write!(f, "{}", self.bean_type),
        }
    }
}
