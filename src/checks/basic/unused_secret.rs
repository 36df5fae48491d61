//! Detects secrets that nothing in the cluster references.

use crate::checks::basic::references::{self, Scanner};
use crate::checks::{Check, CheckResult, GROUP_BASIC};
use crate::objects::Objects;
use crate::types::ObjectKind;

const SCANNERS: &[Scanner] = &[
    references::secrets_in_pod_specs,
    references::secrets_in_service_accounts,
    references::secrets_in_ingresses,
];

/// Flags secrets not referenced by any pod spec, service account or ingress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnusedSecretCheck;

impl Check for UnusedSecretCheck {
    fn name(&self) -> &'static str {
        "unused-secret"
    }

    fn groups(&self) -> &'static [&'static str] {
        &[GROUP_BASIC]
    }

    fn description(&self) -> &'static str {
        "Checks if there are unused secrets in the cluster"
    }

    fn run(&self, objects: &Objects) -> CheckResult {
        objects.pods()?;
        let secrets = objects.secrets()?;

        let referenced = references::collect(objects, SCANNERS);
        let unused = references::unreferenced(secrets, &referenced);

        Ok(references::report_unused(
            self.name(),
            ObjectKind::Secret,
            "Unused secret",
            unused,
        ))
    }
}
