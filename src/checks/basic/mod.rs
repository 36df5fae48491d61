//! Best-practice checks (group `basic`).
//!
//! Most of these are reference-resolution checks: they collect every
//! reference the snapshot makes to a kind of object and report the declared
//! objects nothing points at.

pub mod bare_pods;
pub mod latest_tag;
pub mod references;
pub mod unused_config_map;
pub mod unused_pvc;
pub mod unused_secret;

use crate::checks::{RegistryBuilder, RegistryError};

pub use bare_pods::BarePodsCheck;
pub use latest_tag::LatestTagCheck;
pub use unused_config_map::UnusedConfigMapCheck;
pub use unused_pvc::UnusedPvcCheck;
pub use unused_secret::UnusedSecretCheck;

/// Who gets routed findings from the basic checks.
pub const OWNERS: &[&str] = &["cluster-operators"];

/// Register every basic check.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder.register(BarePodsCheck)?;
    builder.register(LatestTagCheck)?;
    builder.register(UnusedConfigMapCheck)?;
    builder.register(UnusedPvcCheck)?;
    builder.register(UnusedSecretCheck)?;
    Ok(())
}
