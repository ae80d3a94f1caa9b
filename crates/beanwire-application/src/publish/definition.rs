//! Service definitions

use std::fmt;
use std::sync::Arc;

use beanwire_domain::{Bean, BeanKey, Error, ObjectSerializerDefinition, Result};

use crate::ports::serialization::VersionedCodec;
use crate::proxy::{Forwarder, Interceptor, ServiceApi};

/// Supplies the currently bound bean of a late-bound proxy
pub type BeanSource = Arc<dyn Fn() -> Result<Bean> + Send + Sync>;

/// Type-specific decoration, captured when the definition is created
#[derive(Clone, Copy)]
struct ServiceAdapter {
    versioned: fn(&BeanKey, Bean, VersionedCodec) -> Result<Bean>,
    guarded: fn(&BeanKey, Bean, Arc<dyn Interceptor>) -> Result<Bean>,
    late_bound: fn(&BeanKey, BeanSource) -> Bean,
}

impl ServiceAdapter {
    fn of<T: ServiceApi + ?Sized>() -> Self {
        Self {
            versioned: versioned::<T>,
            guarded: guarded::<T>,
            late_bound: late_bound::<T>,
        }
    }
}

pub(crate) fn downcast_service<T: ServiceApi + ?Sized>(key: &BeanKey, bean: &Bean) -> Result<Arc<T>> {
    bean.downcast::<T>().ok_or_else(|| Error::BeanTypeMismatch {
        key: key.clone(),
        expected: std::any::type_name::<T>(),
    })
}

fn versioned<T: ServiceApi + ?Sized>(key: &BeanKey, bean: Bean, codec: VersionedCodec) -> Result<Bean> {
    let inner = downcast_service::<T>(key, &bean)?;
    Ok(Bean::new(T::versioned(inner, codec)))
}

pub(crate) fn guarded<T: ServiceApi + ?Sized>(
    key: &BeanKey,
    bean: Bean,
    guard: Arc<dyn Interceptor>,
) -> Result<Bean> {
    let inner = downcast_service::<T>(key, &bean)?;
    Ok(Bean::new(T::proxy(Forwarder::to(inner).with_interceptor(guard))))
}

fn late_bound<T: ServiceApi + ?Sized>(key: &BeanKey, source: BeanSource) -> Bean {
    let key = key.clone();
    Bean::new(T::proxy(Forwarder::new(move || {
        downcast_service::<T>(&key, &source()?)
    })))
}

/// Immutable description of one published service
#[derive(Clone)]
pub struct ServiceDefinition {
    bean_key: BeanKey,
    defining_api: String,
    serializer: ObjectSerializerDefinition,
    dynamic_qualifier: bool,
    adapter: ServiceAdapter,
}

impl ServiceDefinition {
    /// Unqualified, non-versioned definition of service interface `T`
    pub fn new<T: ServiceApi + ?Sized>() -> Self {
        Self {
            bean_key: BeanKey::of::<T>(),
            defining_api: String::new(),
            serializer: ObjectSerializerDefinition::non_versioned(),
            dynamic_qualifier: false,
            adapter: ServiceAdapter::of::<T>(),
        }
    }

    #[must_use]
    pub fn qualified(mut self, qualifier: impl Into<String>) -> Self {
        self.bean_key = self.bean_key.with_qualifier(Some(qualifier.into()));
        self
    }

    #[must_use]
    pub fn versioned(mut self, serializer: ObjectSerializerDefinition) -> Self {
        self.serializer = serializer;
        self
    }

    /// Accept lookups under any qualifier, creating one bean per qualifier
    #[must_use]
    pub fn with_dynamic_qualifier(mut self) -> Self {
        self.dynamic_qualifier = true;
        self
    }

    #[must_use]
    pub fn defined_by(mut self, api: impl Into<String>) -> Self {
        self.defining_api = api.into();
        self
    }

    /// Same service under another key of the same type
    #[must_use]
    pub fn for_key(&self, key: BeanKey) -> Self {
        Self {
            bean_key: key,
            ..self.clone()
        }
    }

    pub fn bean_key(&self) -> &BeanKey {
        &self.bean_key
    }

    /// Name of the api provider that published this service
    pub fn defining_api(&self) -> &str {
        &self.defining_api
    }

    pub fn serializer(&self) -> &ObjectSerializerDefinition {
        &self.serializer
    }

    pub fn is_versioned(&self) -> bool {
        self.serializer.is_versioned()
    }

    pub fn has_dynamic_qualifier(&self) -> bool {
        self.dynamic_qualifier
    }

    /// Wrap a bound proxy so payloads pass through `codec`
    pub fn decorate_versioned(&self, bean: Bean, codec: VersionedCodec) -> Result<Bean> {
        (self.adapter.versioned)(&self.bean_key, bean, codec)
    }

    /// Wrap a proxy so every call passes through `guard`
    pub fn decorate_guarded(&self, bean: Bean, guard: Arc<dyn Interceptor>) -> Result<Bean> {
        (self.adapter.guarded)(&self.bean_key, bean, guard)
    }

    /// Proxy that forwards each call to whatever `source` currently returns
    pub fn late_bound(&self, source: BeanSource) -> Bean {
        (self.adapter.late_bound)(&self.bean_key, source)
    }
}

impl fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("bean_key", &self.bean_key)
            .field("defining_api", &self.defining_api)
            .field("serializer", &self.serializer)
            .field("dynamic_qualifier", &self.dynamic_qualifier)
            .finish()
    }
}
