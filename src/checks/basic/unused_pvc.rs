//! Detects persistent volume claims no pod mounts.

use crate::checks::basic::references::{self, Scanner};
use crate::checks::{Check, CheckResult, GROUP_BASIC};
use crate::objects::Objects;
use crate::types::ObjectKind;

const SCANNERS: &[Scanner] = &[references::claims_in_pod_specs];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnusedPvcCheck;

impl Check for UnusedPvcCheck {
    fn name(&self) -> &'static str {
        "unused-pvc"
    }

    fn groups(&self) -> &'static [&'static str] {
        &[GROUP_BASIC]
    }

    fn description(&self) -> &'static str {
        "Checks if there are unused persistent volume claims in the cluster"
    }

    fn run(&self, objects: &Objects) -> CheckResult {
        objects.pods()?;
        let claims = objects.persistent_volume_claims()?;

        let referenced = references::collect(objects, SCANNERS);
        Ok(references::report_unused(
            self.name(),
            ObjectKind::PersistentVolumeClaim,
            "Unused persistent volume claim",
            references::unreferenced(claims, &referenced),
        ))
    }
}
