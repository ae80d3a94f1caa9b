//! Explicit forwarding proxies
//!
//! Service beans are never the transport's object itself. Each service interface
//! provides a small forwarding struct over a [`Forwarder`], and decoration
//! (fault tolerance, versioning, late binding) is done by composing forwarders
//! rather than by generating proxies at runtime.
//!
//! ```ignore
//! trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> Result<String>;
//! }
//!
//! struct GreeterProxy(Forwarder<dyn Greeter>);
//!
//! impl Greeter for GreeterProxy {
//!     fn greet(&self, name: &str) -> Result<String> {
//!         self.0.invoke("greet", |target| target.greet(name))
//!     }
//! }
//!
//! struct VersionedGreeter {
//!     inner: Arc<dyn Greeter>,
//!     codec: VersionedCodec,
//! }
//!
//! impl Greeter for VersionedGreeter {
//!     fn greet(&self, name: &str) -> Result<String> {
//!         let name: String = self.codec.round_trip(&name.to_string())?;
//!         let reply = self.inner.greet(&name)?;
//!         self.codec.round_trip(&reply)
//!     }
//! }
//!
//! impl ServiceApi for dyn Greeter {
//!     fn proxy(forwarder: Forwarder<Self>) -> Arc<Self> {
//!         Arc::new(GreeterProxy(forwarder))
//!     }
//!
//!     fn versioned(inner: Arc<Self>, codec: VersionedCodec) -> Arc<Self> {
//!         Arc::new(VersionedGreeter { inner, codec })
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use beanwire_domain::{Error, Result};

use crate::ports::serialization::VersionedCodec;

/// Around-advice applied to every forwarded call
pub trait Interceptor: Send + Sync {
    /// Run `proceed` (possibly several times, or not at all)
    fn intercept(&self, method: &str, proceed: &mut dyn FnMut() -> Result<()>) -> Result<()>;
}

/// A service interface that beanwire can proxy
///
/// Implemented for trait objects, e.g. `impl ServiceApi for dyn Greeter`.
pub trait ServiceApi: Send + Sync + 'static {
    /// Forwarding implementation that routes every method through `forwarder`
    fn proxy(forwarder: Forwarder<Self>) -> Arc<Self>;

    /// Wrap `inner` so arguments and results pass through `codec`
    ///
    /// Applied whenever a service definition of this interface is versioned.
    fn versioned(inner: Arc<Self>, codec: VersionedCodec) -> Arc<Self>;
}

type Target<T> = Arc<dyn Fn() -> Result<Arc<T>> + Send + Sync>;

/// Call-through handle used by forwarding structs
///
/// The target is looked up on every call, so a forwarder can follow an
/// instance that is rebound over time.
pub struct Forwarder<T: ?Sized> {
    target: Target<T>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl<T: ?Sized> Clone for Forwarder<T> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            interceptors: self.interceptors.clone(),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Forwarder<T> {
    /// Forward to whatever `target` returns at call time
    pub fn new(target: impl Fn() -> Result<Arc<T>> + Send + Sync + 'static) -> Self {
        Self {
            target: Arc::new(target),
            interceptors: Vec::new(),
        }
    }

    /// Forward to a fixed instance
    pub fn to(instance: Arc<T>) -> Self {
        Self::new(move || Ok(Arc::clone(&instance)))
    }

    /// Add an interceptor; the first one added is the outermost
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Invoke `call` on the current target through every interceptor
    pub fn invoke<R>(&self, method: &str, call: impl Fn(&T) -> Result<R>) -> Result<R> {
        let mut outcome: Option<R> = None;
        {
            let mut attempt = || -> Result<()> {
                let target = (self.target)()?;
                outcome = Some(call(&*target)?);
                Ok(())
            };
            self.proceed(method, 0, &mut attempt)?;
        }
        outcome.ok_or_else(|| Error::internal(format!("{method} completed without a result")))
    }

    fn proceed(
        &self,
        method: &str,
        index: usize,
        attempt: &mut dyn FnMut() -> Result<()>,
    ) -> Result<()> {
        match self.interceptors.get(index) {
            Some(interceptor) => {
                interceptor.intercept(method, &mut || self.proceed(method, index + 1, &mut *attempt))
            }
            None => attempt(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Forwarder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forwarder")
            .field("target", &std::any::type_name::<T>())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
