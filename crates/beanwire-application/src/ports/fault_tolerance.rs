//! Fault-tolerance ports
//!
//! The runtime does not implement timeouts or circuit breaking itself. It hands
//! every guarded call to a [`FaultTolerancePolicy`] as a type-erased closure.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use beanwire_domain::Result;

use crate::proxy::Interceptor;

/// Identity and limits of one guarded command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    /// Key identifying the command, typically the bean key
    pub command_key: String,
    /// Name of the method being invoked
    pub method: String,
    /// Maximum time a call may take
    pub timeout: Duration,
}

/// Executes calls under a fault-tolerance regime
pub trait FaultTolerancePolicy: Send + Sync {
    fn execute(&self, command: &CommandSettings, call: &mut dyn FnMut() -> Result<()>)
    -> Result<()>;

    fn name(&self) -> &str;
}

type TimeoutSource = Arc<dyn Fn() -> Duration + Send + Sync>;
type EnabledSource = Arc<dyn Fn() -> bool + Send + Sync>;

/// Interceptor that routes every call of one bean through a policy
///
/// Timeout and the enabled flag are read on each call so that configuration
/// changes take effect without recreating the bean.
pub struct FaultToleranceGuard {
    policy: Arc<dyn FaultTolerancePolicy>,
    command_key: String,
    timeout: TimeoutSource,
    enabled: EnabledSource,
}

impl FaultToleranceGuard {
    pub fn new(
        policy: Arc<dyn FaultTolerancePolicy>,
        command_key: impl Into<String>,
        timeout: impl Fn() -> Duration + Send + Sync + 'static,
    ) -> Self {
        Self {
            policy,
            command_key: command_key.into(),
            timeout: Arc::new(timeout),
            enabled: Arc::new(|| true),
        }
    }

    /// Bypass the policy whenever `enabled` returns false
    #[must_use]
    pub fn enabled_when(mut self, enabled: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.enabled = Arc::new(enabled);
        self
    }

    pub fn command_key(&self) -> &str {
        &self.command_key
    }
}

impl Interceptor for FaultToleranceGuard {
    fn intercept(&self, method: &str, proceed: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        if !(self.enabled)() {
            return proceed();
        }
        let command = CommandSettings {
            command_key: self.command_key.clone(),
            method: method.to_string(),
            timeout: (self.timeout)(),
        };
        self.policy.execute(&command, proceed)
    }
}

impl fmt::Debug for FaultToleranceGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultToleranceGuard")
            .field("policy", &self.policy.name())
            .field("command_key", &self.command_key)
            .finish()
    }
}
