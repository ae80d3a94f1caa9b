//! Factory bean ports

use std::sync::Arc;

use beanwire_domain::{Bean, BeanKey, BeanType, CreationContext, Result};

/// Produces one bean on demand
pub trait FactoryBean: Send + Sync {
    /// Create the bean, resolving dependencies through `ctx`
    fn create(&self, ctx: &dyn CreationContext) -> Result<Bean>;

    /// Key of the bean this factory produces
    fn bean_key(&self) -> &BeanKey;

    /// Whether the product's init/destroy hooks are managed by the cache
    ///
    /// Factories that merely forward an instance owned elsewhere report `false`.
    fn lifecycled(&self) -> bool {
        true
    }

    /// Factory for the same bean under another qualifier
    ///
    /// Only factories of dynamically qualified beans return one; registries
    /// consult it when a qualified key has no factory of its own.
    fn qualified_variant(&self, key: &BeanKey) -> Option<Arc<dyn FactoryBean>> {
        let _ = key;
        None
    }
}

/// Maps bean keys to their factories
pub trait FactoryBeanRegistry: Send + Sync {
    /// Factory for `key`
    fn factory_bean(&self, key: &BeanKey) -> Result<Arc<dyn FactoryBean>>;

    /// Every registered key of the given type
    fn beans_of_type(&self, bean_type: &BeanType) -> Vec<BeanKey>;
}

/// Hook applied to every bean exactly once, when it is created
///
/// Post-processors may return the same bean or a wrapped replacement; the
/// returned bean is what gets cached.
pub trait BeanPostProcessor: Send + Sync {
    fn post_process(&self, key: &BeanKey, bean: Bean, ctx: &dyn CreationContext) -> Result<Bean>;
}
