//! Reference resolution: declared objects minus referenced objects.
//!
//! Each referenced kind has a list of scanners. A scanner walks one kind of
//! referencing resource and records `(namespace, name)` pairs. Objects can
//! only reference same-namespace targets, so every reference takes the
//! namespace of the object making it.

use crate::extract::{PodSpecSource, all_containers, all_pod_specs};
use crate::objects::Objects;
use crate::types::{Diagnostic, ObjectKind, ObjectRef, Severity};
use k8s_openapi::Metadata;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashSet;

/// Identities of every object referenced at least once.
pub type ReferenceSet = HashSet<ObjectRef>;

/// Records the references one kind of resource makes.
pub type Scanner = fn(&Objects, &mut ReferenceSet);

/// Run every scanner and collect the union of their references.
pub fn collect(objects: &Objects, scanners: &[Scanner]) -> ReferenceSet {
    let mut refs = ReferenceSet::new();
    for scan in scanners {
        scan(objects, &mut refs);
    }
    refs
}

/// Declared objects that nothing references.
pub fn unreferenced<'a, T>(
    declared: &'a [T],
    referenced: &'a ReferenceSet,
) -> impl Iterator<Item = &'a T> + 'a
where
    T: Metadata<Ty = ObjectMeta>,
{
    declared
        .iter()
        .filter(move |item| !referenced.contains(&ObjectRef::from_meta(item.metadata())))
}

/// One Warning per unreferenced object, deduplicated by identity.
pub fn report_unused<'a, T, I>(check: &str, kind: ObjectKind, message: &str, unused: I) -> Vec<Diagnostic>
where
    T: Metadata<Ty = ObjectMeta> + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    unused
        .into_iter()
        .map(|item| ObjectRef::from_meta(item.metadata()))
        .filter(|object| seen.insert(object.clone()))
        .map(|object| {
            Diagnostic::new(check, Severity::Warning, message, kind, object)
                .with_owners(super::OWNERS)
        })
        .collect()
}

// ============================================================================
// Secrets
// ============================================================================

/// Secrets referenced from pod specs: volumes, projected volumes, `envFrom`,
/// `env[].valueFrom` and image pull secrets.
pub fn secrets_in_pod_specs(objects: &Objects, refs: &mut ReferenceSet) {
    for source in all_pod_specs(objects) {
        secrets_in_pod_spec(&source, refs);
    }
}

fn secrets_in_pod_spec(source: &PodSpecSource<'_>, refs: &mut ReferenceSet) {
    let spec = source.spec;

    for volume in spec.volumes.as_deref().unwrap_or_default() {
        if let Some(name) = volume.secret.as_ref().and_then(|s| s.secret_name.as_deref()) {
            refs.insert(source.local_ref(name));
        }
        if let Some(projected) = &volume.projected {
            for projection in projected.sources.as_deref().unwrap_or_default() {
                if let Some(secret) = &projection.secret {
                    refs.insert(source.local_ref(&secret.name));
                }
            }
        }
    }

    for container in all_containers(spec) {
        for env_from in container.env_from {
            if let Some(secret_ref) = &env_from.secret_ref {
                refs.insert(source.local_ref(&secret_ref.name));
            }
        }
        for env in container.env {
            let selector = env.value_from.as_ref().and_then(|v| v.secret_key_ref.as_ref());
            if let Some(selector) = selector {
                refs.insert(source.local_ref(&selector.name));
            }
        }
    }

    for pull_secret in spec.image_pull_secrets.as_deref().unwrap_or_default() {
        refs.insert(source.local_ref(&pull_secret.name));
    }
}

/// Secrets listed by service accounts, as mountable or image pull secrets.
pub fn secrets_in_service_accounts(objects: &Objects, refs: &mut ReferenceSet) {
    for account in objects.service_accounts().unwrap_or_default() {
        let namespace = &account.metadata.namespace;
        let mountable = account
            .secrets
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.name.clone());
        let pull = account
            .image_pull_secrets
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|r| r.name.clone());
        for name in mountable.chain(pull) {
            refs.insert(ObjectRef {
                name,
                namespace: namespace.clone(),
            });
        }
    }
}

/// Secrets serving ingress TLS.
pub fn secrets_in_ingresses(objects: &Objects, refs: &mut ReferenceSet) {
    for ingress in objects.ingresses().unwrap_or_default() {
        let tls = ingress
            .spec
            .as_ref()
            .and_then(|s| s.tls.as_deref())
            .unwrap_or_default();
        for entry in tls {
            if let Some(name) = &entry.secret_name {
                refs.insert(ObjectRef {
                    name: name.clone(),
                    namespace: ingress.metadata.namespace.clone(),
                });
            }
        }
    }
}

// ============================================================================
// Config maps
// ============================================================================

/// Config maps referenced from pod specs: volumes, projected volumes,
/// `envFrom` and `env[].valueFrom`.
pub fn config_maps_in_pod_specs(objects: &Objects, refs: &mut ReferenceSet) {
    for source in all_pod_specs(objects) {
        let spec = source.spec;

        for volume in spec.volumes.as_deref().unwrap_or_default() {
            if let Some(config_map) = &volume.config_map {
                refs.insert(source.local_ref(&config_map.name));
            }
            if let Some(projected) = &volume.projected {
                for projection in projected.sources.as_deref().unwrap_or_default() {
                    if let Some(config_map) = &projection.config_map {
                        refs.insert(source.local_ref(&config_map.name));
                    }
                }
            }
        }

        for container in all_containers(spec) {
            for env_from in container.env_from {
                if let Some(config_map_ref) = &env_from.config_map_ref {
                    refs.insert(source.local_ref(&config_map_ref.name));
                }
            }
            for env in container.env {
                let selector = env
                    .value_from
                    .as_ref()
                    .and_then(|v| v.config_map_key_ref.as_ref());
                if let Some(selector) = selector {
                    refs.insert(source.local_ref(&selector.name));
                }
            }
        }
    }
}

// ============================================================================
// Persistent volume claims
// ============================================================================

/// Claims mounted as pod volumes.
pub fn claims_in_pod_specs(objects: &Objects, refs: &mut ReferenceSet) {
    for source in all_pod_specs(objects) {
        for volume in source.spec.volumes.as_deref().unwrap_or_default() {
            if let Some(claim) = &volume.persistent_volume_claim {
                refs.insert(source.local_ref(&claim.claim_name));
            }
        }
    }
}
