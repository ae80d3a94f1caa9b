//! Basic factory bean implementations

use std::fmt;
use std::sync::Arc;

use beanwire_application::ports::FactoryBean;
use beanwire_domain::{Bean, BeanKey, CreationContext, Error, Result};

/// Hands out an instance created and owned elsewhere
pub struct InstanceFactoryBean {
    key: BeanKey,
    bean: Bean,
}

impl InstanceFactoryBean {
    pub fn new(key: BeanKey, bean: Bean) -> Self {
        Self { key, bean }
    }

    /// Register `instance` as the unqualified bean of type `T`
    pub fn of<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self::new(BeanKey::of::<T>(), Bean::new(instance))
    }
}

impl FactoryBean for InstanceFactoryBean {
    fn create(&self, _ctx: &dyn CreationContext) -> Result<Bean> {
        Ok(self.bean.clone())
    }

    fn bean_key(&self) -> &BeanKey {
        &self.key
    }

    fn lifecycled(&self) -> bool {
        false
    }
}

type CreateFn = Arc<dyn Fn(&dyn CreationContext) -> Result<Bean> + Send + Sync>;

/// Builds its bean with a closure
pub struct FnFactoryBean {
    key: BeanKey,
    create: CreateFn,
}

impl FnFactoryBean {
    pub fn new(
        key: BeanKey,
        create: impl Fn(&dyn CreationContext) -> Result<Bean> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            create: Arc::new(create),
        }
    }

    /// Unqualified bean of type `T` built by `create`
    pub fn of<T, F>(create: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn CreationContext) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self::new(BeanKey::of::<T>(), move |ctx| create(ctx).map(Bean::new))
    }
}

impl FactoryBean for FnFactoryBean {
    fn create(&self, ctx: &dyn CreationContext) -> Result<Bean> {
        (self.create)(ctx)
    }

    fn bean_key(&self) -> &BeanKey {
        &self.key
    }
}

impl fmt::Debug for FnFactoryBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactoryBean").field("key", &self.key).finish()
    }
}

/// Builds a concrete component through the constructor carried by its key type
pub struct ConstructorFactoryBean {
    key: BeanKey,
}

impl ConstructorFactoryBean {
    /// Fails with a configuration error if the key's type has no constructor
    pub fn new(key: BeanKey) -> Result<Self> {
        if key.bean_type().constructor().is_none() {
            return Err(Error::configuration(format!(
                "{key} is not a constructible component"
            )));
        }
        Ok(Self { key })
    }
}

impl FactoryBean for ConstructorFactoryBean {
    fn create(&self, ctx: &dyn CreationContext) -> Result<Bean> {
        match self.key.bean_type().constructor() {
            Some(construct) => construct(ctx),
            None => Err(Error::configuration(format!(
                "{} is not a constructible component",
                self.key
            ))),
        }
    }

    fn bean_key(&self) -> &BeanKey {
        &self.key
    }
}
