//! Property tests for the unused-secret reference resolution.

use cluster_lint::checks::basic::UnusedSecretCheck;
use cluster_lint::{Check, ObjectRef, Objects};
use k8s_openapi::api::core::v1::{
    Container, EnvFromSource, EnvVar, EnvVarSource, LocalObjectReference, Pod, PodSpec, Secret,
    SecretEnvSource, SecretKeySelector, SecretVolumeSource, Volume,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use proptest::prelude::*;
use std::collections::HashSet;

const NAMESPACES: &[&str] = &["prod", "staging"];

fn meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

fn secret_name() -> impl Strategy<Value = String> {
    (0..6u8).prop_map(|i| format!("secret-{}", i))
}

fn namespace() -> impl Strategy<Value = &'static str> {
    prop::sample::select(NAMESPACES)
}

/// A pod referencing secrets; each reference uses one of the five mechanisms.
fn pod() -> impl Strategy<Value = (String, &'static str, Vec<(u8, String)>)> {
    (
        (0..100u32).prop_map(|i| format!("pod-{}", i)),
        namespace(),
        prop::collection::vec((0..5u8, secret_name()), 0..4),
    )
}

fn build_pod(name: &str, namespace: &str, refs: &[(u8, String)]) -> Pod {
    let mut spec = PodSpec {
        containers: vec![Container {
            name: "app".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };
    for (mechanism, secret) in refs {
        match mechanism {
            0 => spec.volumes.get_or_insert_with(Vec::new).push(Volume {
                name: format!("vol-{}", secret),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(secret.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            1 => spec.containers[0]
                .env_from
                .get_or_insert_with(Vec::new)
                .push(EnvFromSource {
                    secret_ref: Some(SecretEnvSource {
                        name: secret.clone(),
                        optional: None,
                    }),
                    ..Default::default()
                }),
            2 => spec.containers[0]
                .env
                .get_or_insert_with(Vec::new)
                .push(EnvVar {
                    name: "VALUE".to_string(),
                    value_from: Some(EnvVarSource {
                        secret_key_ref: Some(SecretKeySelector {
                            name: secret.clone(),
                            key: "value".to_string(),
                            optional: None,
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            3 => spec
                .image_pull_secrets
                .get_or_insert_with(Vec::new)
                .push(LocalObjectReference {
                    name: secret.clone(),
                }),
            _ => spec
                .init_containers
                .get_or_insert_with(Vec::new)
                .push(Container {
                    name: format!("init-{}", secret),
                    env_from: Some(vec![EnvFromSource {
                        secret_ref: Some(SecretEnvSource {
                            name: secret.clone(),
                            optional: None,
                        }),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }),
        }
    }
    Pod {
        metadata: meta(name, namespace),
        spec: Some(spec),
        ..Default::default()
    }
}

fn snapshot(secrets: &[(String, &str)], pods: &[(String, &str, Vec<(u8, String)>)]) -> Objects {
    Objects::builder()
        .secrets(
            secrets
                .iter()
                .map(|(name, ns)| Secret {
                    metadata: meta(name, ns),
                    ..Default::default()
                })
                .collect(),
        )
        .pods(
            pods.iter()
                .map(|(name, ns, refs)| build_pod(name, ns, refs))
                .collect(),
        )
        .build()
}

fn unused(objects: &Objects) -> Vec<ObjectRef> {
    UnusedSecretCheck
        .run(objects)
        .unwrap()
        .into_iter()
        .map(|d| d.object)
        .collect()
}

proptest! {
    #[test]
    fn unused_secrets_are_declared_minus_referenced(
        secrets in prop::collection::vec((secret_name(), namespace()), 0..8),
        pods in prop::collection::vec(pod(), 0..5),
    ) {
        let reported = unused(&snapshot(&secrets, &pods));

        let referenced: HashSet<ObjectRef> = pods
            .iter()
            .flat_map(|(_, ns, refs)| refs.iter().map(move |(_, s)| ObjectRef::new(s.clone(), *ns)))
            .collect();
        let expected: HashSet<ObjectRef> = secrets
            .iter()
            .map(|(name, ns)| ObjectRef::new(name.clone(), *ns))
            .filter(|secret| !referenced.contains(secret))
            .collect();

        let reported_set: HashSet<ObjectRef> = reported.iter().cloned().collect();
        prop_assert_eq!(reported.len(), reported_set.len());
        prop_assert_eq!(reported_set, expected);
    }

    #[test]
    fn result_ignores_input_order_and_is_idempotent(
        secrets in prop::collection::vec((secret_name(), namespace()), 0..8),
        pods in prop::collection::vec(pod(), 0..5),
    ) {
        let objects = snapshot(&secrets, &pods);
        let first: HashSet<ObjectRef> = unused(&objects).into_iter().collect();
        let again: HashSet<ObjectRef> = unused(&objects).into_iter().collect();
        prop_assert_eq!(&first, &again);

        let mut secrets_rev = secrets.clone();
        secrets_rev.reverse();
        let mut pods_rev = pods.clone();
        pods_rev.reverse();
        let reordered: HashSet<ObjectRef> =
            unused(&snapshot(&secrets_rev, &pods_rev)).into_iter().collect();
        prop_assert_eq!(first, reordered);
    }
}
