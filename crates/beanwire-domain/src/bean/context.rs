//! Creation context handed to factories
//!
//! Factories declare their dependencies lazily by calling back into the
//! resolving factory through a [`CreationContext`]. Every context carries the
//! [`ResolutionChain`] of keys currently being created on this call path, which
//! is how cycles are detected without thread-local state.

use std::sync::Arc;

use super::instance::Bean;
use super::key::BeanKey;
use crate::error::{Error, Result};

/// Per-resolution handle passed to a factory's create operation
pub trait CreationContext: Send + Sync {
    /// Resolve a dependency of the bean currently being created
    fn get_bean(&self, key: &BeanKey) -> Result<Bean>;

    /// Keys being created on the current call path, outermost first
    fn resolution_chain(&self) -> &ResolutionChain;
}

impl dyn CreationContext + '_ {
    /// Resolve `key` and downcast it to `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, key: &BeanKey) -> Result<Arc<T>> {
        self.get_bean(key)?
            .downcast::<T>()
            .ok_or_else(|| Error::BeanTypeMismatch {
                key: key.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolve the unqualified bean of type `T`
    pub fn bean<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.get::<T>(&BeanKey::of::<T>())
    }

    /// Resolve a concrete component, constructing it if nothing is bound
    pub fn component<C: Component>(&self) -> Result<Arc<C>> {
        self.get::<C>(&BeanKey::component::<C>())
    }
}

/// A concrete type that can build itself from its dependencies
///
/// Module injectors fall back to `construct` for component types that are
/// neither bound nor imported.
pub trait Component: Send + Sync + Sized + 'static {
    fn construct(ctx: &dyn CreationContext) -> Result<Self>;

    /// Wrap a constructed instance; override to attach lifecycle hooks
    fn into_bean(self: Arc<Self>) -> Bean {
        Bean::new(self)
    }
}

/// One key being created within a given factory scope
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChainLink {
    scope: u64,
    key: BeanKey,
}

/// Ordered set of keys in flight on one resolution call path
///
/// Links are scoped by the id of the factory that is creating them so that the
/// same key resolved by two different factories (for example an import in one
/// module that delegates to an export of another) is not mistaken for a cycle.
#[derive(Debug, Clone, Default)]
pub struct ResolutionChain {
    links: Vec<ChainLink>,
}

impl ResolutionChain {
    /// Chain extended with `key` created by factory `scope`
    #[must_use]
    pub fn push(&self, scope: u64, key: BeanKey) -> Self {
        let mut links = self.links.clone();
        links.push(ChainLink { scope, key });
        Self { links }
    }

    /// If `key` is already in flight in `scope`, the cycle from its first
    /// occurrence back to itself
    pub fn cycle_with(&self, scope: u64, key: &BeanKey) -> Option<Vec<BeanKey>> {
        let start = self
            .links
            .iter()
            .position(|link| link.scope == scope && &link.key == key)?;
        let mut cycle: Vec<BeanKey> = self.links[start..]
            .iter()
            .map(|link| link.key.clone())
            .collect();
        cycle.push(key.clone());
        Some(cycle)
    }

    /// Keys in flight, outermost first
    pub fn keys(&self) -> impl Iterator<Item = &BeanKey> {
        self.links.iter().map(|link| &link.key)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
