//! Detects config maps that no pod spec references.

use crate::checks::basic::references::{self, Scanner};
use crate::checks::{Check, CheckResult, GROUP_BASIC};
use crate::objects::Objects;
use crate::types::ObjectKind;

/// Published into every namespace by the control plane.
const ROOT_CA_CONFIG_MAP: &str = "kube-root-ca.crt";

const SCANNERS: &[Scanner] = &[references::config_maps_in_pod_specs];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnusedConfigMapCheck;

impl Check for UnusedConfigMapCheck {
    fn name(&self) -> &'static str {
        "unused-config-map"
    }

    fn groups(&self) -> &'static [&'static str] {
        &[GROUP_BASIC]
    }

    fn description(&self) -> &'static str {
        "Checks if there are unused config maps in the cluster"
    }

    fn run(&self, objects: &Objects) -> CheckResult {
        objects.pods()?;
        let config_maps = objects.config_maps()?;

        let referenced = references::collect(objects, SCANNERS);
        let unused = references::unreferenced(config_maps, &referenced)
            .filter(|cm| cm.metadata.name.as_deref() != Some(ROOT_CA_CONFIG_MAP));

        Ok(references::report_unused(
            self.name(),
            ObjectKind::ConfigMap,
            "Unused config map",
            unused,
        ))
    }
}
