//! Error handling types

use thiserror::Error;

use crate::bean::BeanKey;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error source carried by the contextual variants
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for beanwire
#[derive(Error, Debug)]
pub enum Error {
    /// No factory is registered for the requested key
    #[error("No such bean: {key}")]
    NoSuchBean {
        /// The key that could not be resolved
        key: BeanKey,
    },

    /// A bean transitively depends on itself
    #[error("Circular dependency detected: {}", format_cycle(.cycle))]
    CircularDependency {
        /// Keys from the first occurrence of the repeated key back to itself
        cycle: Vec<BeanKey>,
    },

    /// Two factories were registered for the same key
    #[error("Ambiguous provider for {key}: {message}")]
    AmbiguousProvider {
        /// The key registered more than once
        key: BeanKey,
        /// Description of the conflict
        message: String,
    },

    /// Illegal wiring, unresolved import, unknown component or bad configuration value
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Service discovery or transport bind failure
    #[error("Binding error: {message}")]
    Binding {
        /// Description of the binding error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// A wait-until-bound deadline elapsed
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of what timed out
        message: String,
    },

    /// An init or destroy hook failed
    #[error("Lifecycle error: {message}")]
    Lifecycle {
        /// Description of the lifecycle error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// An operation was invoked in a state that does not permit it
    #[error("Illegal state: {message}")]
    IllegalState {
        /// Description of the illegal state
        message: String,
    },

    /// A call was made on a service bean that is not currently bound
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Description of why the service is unavailable
        message: String,
    },

    /// A bean was found but is not of the requested type
    #[error("Bean {key} is not of type {expected}")]
    BeanTypeMismatch {
        /// The resolved key
        key: BeanKey,
        /// Name of the requested type
        expected: &'static str,
    },

    /// A factory failed with an error that is not one of the designated kinds
    #[error("Failed to create bean {id}: {source}")]
    BeanCreation {
        /// Display form of the id being created
        id: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    Serialization {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

fn format_cycle(cycle: &[BeanKey]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

// Helper constructors
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a binding error
    pub fn binding<S: Into<String>>(message: S) -> Self {
        Self::Binding {
            message: message.into(),
            source: None,
        }
    }

    /// Create a binding error with source
    pub fn binding_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Binding {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a lifecycle error
    pub fn lifecycle<S: Into<String>>(message: S) -> Self {
        Self::Lifecycle {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lifecycle error with source
    pub fn lifecycle_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Lifecycle {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an illegal state error
    pub fn illegal_state<S: Into<String>>(message: S) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a no-such-bean error
    pub fn no_such_bean(key: &BeanKey) -> Self {
        Self::NoSuchBean { key: key.clone() }
    }

    /// Wrap a factory failure with the id that was being created
    pub fn bean_creation(id: impl std::fmt::Display, source: Error) -> Self {
        Self::BeanCreation {
            id: id.to_string(),
            source: Box::new(source),
        }
    }

    /// Whether this is one of the designated runtime kinds that propagate unwrapped
    /// out of a factory body
    pub fn is_runtime_kind(&self) -> bool {
        !matches!(self, Self::Serialization { .. } | Self::Internal { .. })
    }

    /// Whether this is an expected runtime condition rather than a programming or
    /// deployment error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Binding { .. } | Self::Timeout { .. } | Self::ServiceUnavailable { .. }
        )
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
