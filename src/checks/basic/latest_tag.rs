//! Detects containers running an unpinned or `latest` image.

use crate::checks::basic::OWNERS;
use crate::checks::{Check, CheckResult, GROUP_BASIC};
use crate::extract::{all_containers, all_pod_specs};
use crate::objects::Objects;
use crate::types::{Diagnostic, ObjectRef, Severity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestTagCheck;

impl Check for LatestTagCheck {
    fn name(&self) -> &'static str {
        "latest-tag"
    }

    fn groups(&self) -> &'static [&'static str] {
        &[GROUP_BASIC]
    }

    fn description(&self) -> &'static str {
        "Checks if there are pods or workload templates with container images having the latest tag or no tag"
    }

    fn run(&self, objects: &Objects) -> CheckResult {
        objects.pods()?;
        let mut diagnostics = Vec::new();

        for source in all_pod_specs(objects) {
            let owner_name = source.meta.name.as_deref().unwrap_or_default();

            for container in all_containers(source.spec) {
                if !container.image.is_some_and(uses_latest_tag) {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::new(
                        self.name(),
                        Severity::Warning,
                        format!(
                            "Avoid using latest tag for container '{}' in {} '{}'",
                            container.name,
                            source.kind.as_str().to_lowercase(),
                            owner_name
                        ),
                        source.kind,
                        ObjectRef::from_meta(source.meta),
                    )
                    .with_owners(OWNERS),
                );
            }
        }

        Ok(diagnostics)
    }
}

/// Whether an image reference floats: no tag, or the `latest` tag.
/// Digest-pinned references never float.
fn uses_latest_tag(image: &str) -> bool {
    if image.contains('@') {
        return false;
    }
    // A registry port ("host:5000/app") lives before the last slash.
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    match last_segment.split_once(':') {
        Some((_, tag)) => tag == "latest",
        None => true,
    }
}
