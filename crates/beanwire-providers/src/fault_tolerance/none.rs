//! Pass-through policy

use beanwire_application::ports::fault_tolerance::{CommandSettings, FaultTolerancePolicy};
use beanwire_domain::Result;

use crate::constants::NO_FAULT_TOLERANCE_POLICY;

/// Runs every call directly, without timeouts or circuit breaking
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaultTolerance;

impl FaultTolerancePolicy for NoFaultTolerance {
    fn execute(
        &self,
        _command: &CommandSettings,
        call: &mut dyn FnMut() -> Result<()>,
    ) -> Result<()> {
        call()
    }

    fn name(&self) -> &str {
        NO_FAULT_TOLERANCE_POLICY
    }
}
