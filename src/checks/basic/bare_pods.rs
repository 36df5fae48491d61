//! Detects pods not managed by any controller.

use crate::checks::basic::OWNERS;
use crate::checks::{Check, CheckResult, GROUP_BASIC};
use crate::objects::Objects;
use crate::types::{Diagnostic, ObjectKind, ObjectRef, Severity};

/// Flags pods with no owner references. Nothing reschedules a bare pod
/// when its node goes away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarePodsCheck;

impl Check for BarePodsCheck {
    fn name(&self) -> &'static str {
        "bare-pods"
    }

    fn groups(&self) -> &'static [&'static str] {
        &[GROUP_BASIC]
    }

    fn description(&self) -> &'static str {
        "Checks if there are bare pods in the cluster"
    }

    fn run(&self, objects: &Objects) -> CheckResult {
        let diagnostics = objects
            .pods()?
            .iter()
            .filter(|pod| {
                pod.metadata
                    .owner_references
                    .as_ref()
                    .is_none_or(|owners| owners.is_empty())
            })
            .map(|pod| {
                Diagnostic::new(
                    self.name(),
                    Severity::Warning,
                    "Avoid using bare pods in clusters",
                    ObjectKind::Pod,
                    ObjectRef::from_meta(&pod.metadata),
                )
                .with_owners(OWNERS)
            })
            .collect();
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Pod;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

    fn pod(name: &str, owners: Option<Vec<OwnerReference>>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("k8s".to_string()),
                owner_references: owners,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_bare_pods() {
        let owned = pod(
            "web-7d4b9",
            Some(vec![OwnerReference {
                api_version: "apps/v1".to_string(),
                kind: "ReplicaSet".to_string(),
                name: "web".to_string(),
                uid: "1234".to_string(),
                ..Default::default()
            }]),
        );
        let objects = Objects::builder()
            .pods(vec![owned, pod("bare", None), pod("empty-owners", Some(Vec::new()))])
            .build();

        let mut names: Vec<String> = BarePodsCheck
            .run(&objects)
            .unwrap()
            .into_iter()
            .map(|d| d.object.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["bare".to_string(), "empty-owners".to_string()]);
    }

    #[test]
    fn test_requires_pods() {
        assert!(BarePodsCheck.run(&Objects::default()).is_err());
    }
}
