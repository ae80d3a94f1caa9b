//! Bean factory
//!
//! Resolves keys to instances through a [`FactoryBeanRegistry`], caching each
//! instance by key. Every nested resolution carries the [`ResolutionChain`] of
//! its callers, so a key that reappears on its own chain is reported as a cycle
//! instead of deadlocking on its creation lock.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use beanwire_application::ports::{BeanPostProcessor, FactoryBeanRegistry};
use beanwire_domain::{Bean, BeanKey, BeanType, CreationContext, Error, ResolutionChain, Result};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use super::object_cache::ObjectCache;

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// Creates, decorates and caches beans
pub struct BeanFactory {
    scope: u64,
    name: String,
    registry: Arc<dyn FactoryBeanRegistry>,
    cache: ObjectCache<BeanKey>,
    post_processors: RwLock<Vec<Arc<dyn BeanPostProcessor>>>,
    dependencies: DashMap<BeanKey, Vec<BeanKey>>,
}

impl BeanFactory {
    /// Factory named `name` (used in logs) over `registry`
    pub fn new(name: impl Into<String>, registry: Arc<dyn FactoryBeanRegistry>) -> Self {
        Self {
            scope: NEXT_SCOPE.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            registry,
            cache: ObjectCache::new(),
            post_processors: RwLock::new(Vec::new()),
            dependencies: DashMap::new(),
        }
    }

    /// Identifier distinguishing this factory's links in a resolution chain
    pub fn scope(&self) -> u64 {
        self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a post-processor; post-processors run in registration order
    pub fn register_post_processor(&self, processor: Arc<dyn BeanPostProcessor>) {
        self.post_processors.write().push(processor);
    }

    /// Resolve `key` from the top of a call chain
    pub fn get_bean(&self, key: &BeanKey) -> Result<Bean> {
        self.resolve(key, &ResolutionChain::default())
    }

    /// Resolve `key` and downcast it to `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, key: &BeanKey) -> Result<Arc<T>> {
        self.get_bean(key)?
            .downcast::<T>()
            .ok_or_else(|| Error::BeanTypeMismatch {
                key: key.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolve `key` on behalf of the callers in `chain`
    pub fn resolve(&self, key: &BeanKey, chain: &ResolutionChain) -> Result<Bean> {
        if let Some(cycle) = chain.cycle_with(self.scope, key) {
            return Err(Error::CircularDependency { cycle });
        }
        if let Some(bean) = self.cache.get(key) {
            trace!(factory = %self.name, bean_key = %key, "Cache hit");
            return Ok(bean);
        }

        let factory = self.registry.factory_bean(key)?;
        self.cache.get_instance(key, || {
            let frame = CreationFrame {
                factory: self,
                chain: chain.push(self.scope, key.clone()),
                touched: Mutex::new(Vec::new()),
            };
            let mut bean = factory.create(&frame)?;
            let processors = self.post_processors.read().clone();
            for processor in &processors {
                bean = processor.post_process(key, bean, &frame)?;
            }
            if !factory.lifecycled() {
                bean = bean.without_lifecycle();
            }
            let touched = frame.touched.into_inner();
            debug!(
                factory = %self.name,
                bean_key = %key,
                dependencies = touched.len(),
                "Created bean"
            );
            self.dependencies.insert(key.clone(), touched);
            Ok(bean)
        })
    }

    /// Keys resolved, directly or transitively, while `key` was created
    ///
    /// Creates `key` if needed. The result reflects the calls its factory
    /// actually made, not a static graph.
    pub fn dependencies(&self, key: &BeanKey) -> Result<Vec<BeanKey>> {
        self.get_bean(key)?;
        let mut found: Vec<BeanKey> = Vec::new();
        let mut pending: VecDeque<BeanKey> = self.direct_dependencies(key).into();
        while let Some(next) = pending.pop_front() {
            if &next == key || found.contains(&next) {
                continue;
            }
            pending.extend(self.direct_dependencies(&next));
            found.push(next);
        }
        Ok(found)
    }

    fn direct_dependencies(&self, key: &BeanKey) -> Vec<BeanKey> {
        self.dependencies
            .get(key)
            .map(|deps| deps.value().clone())
            .unwrap_or_default()
    }

    /// Registered keys of `bean_type`
    pub fn beans_of_type(&self, bean_type: &BeanType) -> Vec<BeanKey> {
        self.registry.beans_of_type(bean_type)
    }

    /// Whether `key` has been created and is still cached
    pub fn is_created(&self, key: &BeanKey) -> bool {
        self.cache.contains(key)
    }

    /// Evict one bean, running its destroy hook
    pub fn destroy_bean(&self, key: &BeanKey) {
        self.cache.destroy_in_cache(key);
        self.dependencies.remove(key);
    }

    /// Destroy every created bean
    pub fn destroy(&self) {
        debug!(factory = %self.name, beans = self.cache.len(), "Destroying bean factory");
        self.cache.destroy();
        self.dependencies.clear();
    }
}

impl fmt::Debug for BeanFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanFactory")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("created", &self.cache.len())
            .finish()
    }
}

/// Context handed to one factory invocation
struct CreationFrame<'a> {
    factory: &'a BeanFactory,
    chain: ResolutionChain,
    touched: Mutex<Vec<BeanKey>>,
}

impl CreationContext for CreationFrame<'_> {
    fn get_bean(&self, key: &BeanKey) -> Result<Bean> {
        {
            let mut touched = self.touched.lock();
            if !touched.contains(key) {
                touched.push(key.clone());
            }
        }
        self.factory.resolve(key, &self.chain)
    }

    fn resolution_chain(&self) -> &ResolutionChain {
        &self.chain
    }
}
