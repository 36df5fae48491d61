//! Detects containers running in privileged mode.

use crate::checks::security::OWNERS;
use crate::checks::{Check, CheckResult, GROUP_SECURITY};
use crate::extract::{all_containers, all_pod_specs};
use crate::objects::Objects;
use crate::types::{Diagnostic, ObjectRef, Severity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrivilegedContainersCheck;

impl Check for PrivilegedContainersCheck {
    fn name(&self) -> &'static str {
        "privileged-containers"
    }

    fn groups(&self) -> &'static [&'static str] {
        &[GROUP_SECURITY]
    }

    fn description(&self) -> &'static str {
        "Checks if there are pods or workload templates with containers in privileged mode"
    }

    fn run(&self, objects: &Objects) -> CheckResult {
        objects.pods()?;
        let mut diagnostics = Vec::new();

        for source in all_pod_specs(objects) {
            for container in all_containers(source.spec) {
                let privileged = container
                    .security_context
                    .and_then(|sc| sc.privileged)
                    .unwrap_or(false);
                if privileged {
                    diagnostics.push(
                        Diagnostic::new(
                            self.name(),
                            Severity::Warning,
                            format!(
                                "Privileged container '{}' found. Please ensure that the image is from a trusted source.",
                                container.name
                            ),
                            source.kind,
                            ObjectRef::from_meta(source.meta),
                        )
                        .with_owners(OWNERS),
                    );
                }
            }
        }

        Ok(diagnostics)
    }
}
