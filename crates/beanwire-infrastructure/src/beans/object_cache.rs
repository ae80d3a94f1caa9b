//! Lifecycle-managed singleton cache
//!
//! Creation of an id happens at most once, under the id's key lock. The cache is
//! re-checked after the lock is acquired because a concurrent caller may have
//! just finished creating the same id. Instances are published only after their
//! `init` hook succeeds.

use std::fmt::Display;
use std::hash::Hash;

use beanwire_domain::{Bean, Error, Result};
use dashmap::DashMap;
use tracing::{debug, error};

use super::key_lock::KeyLock;
use crate::error_ext::ErrorContext;

/// Created instances by id
pub struct ObjectCache<K: Eq + Hash + Clone + Display> {
    instances: DashMap<K, Bean>,
    locks: KeyLock<K>,
}

impl<K: Eq + Hash + Clone + Display> Default for ObjectCache<K> {
    fn default() -> Self {
        Self {
            instances: DashMap::new(),
            locks: KeyLock::default(),
        }
    }
}

impl<K: Eq + Hash + Clone + Display> ObjectCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached instance for `id`, created by `create` on a miss
    ///
    /// Failures other than the designated runtime kinds are wrapped with `id` as
    /// context. A failing `init` hook fails creation and nothing is cached.
    pub fn get_instance<F>(&self, id: &K, create: F) -> Result<Bean>
    where
        F: FnOnce() -> Result<Bean>,
    {
        if let Some(bean) = self.instances.get(id) {
            return Ok(bean.value().clone());
        }

        let _guard = self.locks.guard(id);
        if let Some(bean) = self.instances.get(id) {
            return Ok(bean.value().clone());
        }

        let bean = create().map_err(|err| {
            if err.is_runtime_kind() {
                err
            } else {
                Error::bean_creation(id, err)
            }
        })?;
        if let Some(lifecycle) = bean.lifecycle() {
            lifecycle
                .init()
                .lifecycle_context(format!("Failed to initialize {id}"))?;
        }

        debug!(id = %id, bean_type = bean.type_name(), "Created cached instance");
        self.instances.insert(id.clone(), bean.clone());
        Ok(bean)
    }

    /// Cached instance for `id` without creating one
    pub fn get(&self, id: &K) -> Option<Bean> {
        self.instances.get(id).map(|bean| bean.value().clone())
    }

    /// Evict `id` and run its destroy hook; a missing entry is a no-op
    pub fn destroy_in_cache(&self, id: &K) {
        let _guard = self.locks.guard(id);
        let Some((_, bean)) = self.instances.remove(id) else {
            return;
        };
        if let Some(lifecycle) = bean.lifecycle() {
            if let Err(err) = lifecycle.destroy() {
                error!(id = %id, error = %err, "Failed to destroy cached instance");
            } else {
                debug!(id = %id, "Destroyed cached instance");
            }
        }
    }

    /// Destroy every cached instance
    ///
    /// Each failure is logged and the remaining entries are still destroyed.
    pub fn destroy(&self) {
        let ids: Vec<K> = self.instances.iter().map(|entry| entry.key().clone()).collect();
        for id in &ids {
            self.destroy_in_cache(id);
        }
    }

    pub fn contains(&self, id: &K) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
