//! Workload privilege checks (group `security`).

pub mod privileged_containers;

use crate::checks::{RegistryBuilder, RegistryError};

pub use privileged_containers::PrivilegedContainersCheck;

/// Who gets routed findings from the security checks.
pub const OWNERS: &[&str] = &["security"];

/// Register every security check.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder.register(PrivilegedContainersCheck)?;
    Ok(())
}
