//! Pod spec and container extraction.
//!
//! Many resource kinds embed a pod spec. These helpers let checks walk every
//! one of them without caring which kind carries it.

use crate::objects::Objects;
use crate::types::{ObjectKind, ObjectRef};
use k8s_openapi::api::core::v1::{
    Container, EnvFromSource, EnvVar, EphemeralContainer, PodSpec, PodTemplateSpec,
    SecurityContext,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// A pod spec together with the object that carries it.
#[derive(Debug, Clone, Copy)]
pub struct PodSpecSource<'a> {
    /// Kind of the carrying object.
    pub kind: ObjectKind,
    /// Metadata of the carrying object.
    pub meta: &'a ObjectMeta,
    pub spec: &'a PodSpec,
}

impl PodSpecSource<'_> {
    /// Identity of a same-namespace object named `name`.
    pub fn local_ref(&self, name: &str) -> ObjectRef {
        ObjectRef {
            name: name.to_string(),
            namespace: self.meta.namespace.clone(),
        }
    }
}

/// Extract the pod specs of bare pods only. Pods without a spec yield nothing.
pub fn pod_specs_of_pods(objects: &Objects) -> Vec<PodSpecSource<'_>> {
    objects
        .pods
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|pod| {
            pod.spec.as_ref().map(|spec| PodSpecSource {
                kind: ObjectKind::Pod,
                meta: &pod.metadata,
                spec,
            })
        })
        .collect()
}

/// Extract every pod spec in the snapshot: bare pods, pod templates and the
/// templates embedded in workloads. Absent lists contribute nothing.
pub fn all_pod_specs(objects: &Objects) -> Vec<PodSpecSource<'_>> {
    let mut specs = pod_specs_of_pods(objects);

    for t in objects.pod_templates.as_deref().unwrap_or_default() {
        add_template(&mut specs, ObjectKind::PodTemplate, &t.metadata, t.template.as_ref());
    }
    for d in objects.deployments.as_deref().unwrap_or_default() {
        let template = d.spec.as_ref().map(|s| &s.template);
        add_template(&mut specs, ObjectKind::Deployment, &d.metadata, template);
    }
    for s in objects.stateful_sets.as_deref().unwrap_or_default() {
        let template = s.spec.as_ref().map(|s| &s.template);
        add_template(&mut specs, ObjectKind::StatefulSet, &s.metadata, template);
    }
    for d in objects.daemon_sets.as_deref().unwrap_or_default() {
        let template = d.spec.as_ref().map(|s| &s.template);
        add_template(&mut specs, ObjectKind::DaemonSet, &d.metadata, template);
    }
    for r in objects.replica_sets.as_deref().unwrap_or_default() {
        let template = r.spec.as_ref().and_then(|s| s.template.as_ref());
        add_template(&mut specs, ObjectKind::ReplicaSet, &r.metadata, template);
    }
    for j in objects.jobs.as_deref().unwrap_or_default() {
        let template = j.spec.as_ref().map(|s| &s.template);
        add_template(&mut specs, ObjectKind::Job, &j.metadata, template);
    }
    for c in objects.cron_jobs.as_deref().unwrap_or_default() {
        let template = c
            .spec
            .as_ref()
            .and_then(|s| s.job_template.spec.as_ref())
            .map(|s| &s.template);
        add_template(&mut specs, ObjectKind::CronJob, &c.metadata, template);
    }

    specs
}

fn add_template<'a>(
    specs: &mut Vec<PodSpecSource<'a>>,
    kind: ObjectKind,
    meta: &'a ObjectMeta,
    template: Option<&'a PodTemplateSpec>,
) {
    if let Some(spec) = template.and_then(|t| t.spec.as_ref()) {
        specs.push(PodSpecSource { kind, meta, spec });
    }
}

/// The fields checks read from any container, regardless of its flavour.
#[derive(Debug, Clone, Copy)]
pub struct ContainerView<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub env: &'a [EnvVar],
    pub env_from: &'a [EnvFromSource],
    pub security_context: Option<&'a SecurityContext>,
}

impl<'a> From<&'a Container> for ContainerView<'a> {
    fn from(c: &'a Container) -> Self {
        Self {
            name: &c.name,
            image: c.image.as_deref(),
            env: c.env.as_deref().unwrap_or_default(),
            env_from: c.env_from.as_deref().unwrap_or_default(),
            security_context: c.security_context.as_ref(),
        }
    }
}

impl<'a> From<&'a EphemeralContainer> for ContainerView<'a> {
    fn from(c: &'a EphemeralContainer) -> Self {
        Self {
            name: &c.name,
            image: c.image.as_deref(),
            env: c.env.as_deref().unwrap_or_default(),
            env_from: c.env_from.as_deref().unwrap_or_default(),
            security_context: c.security_context.as_ref(),
        }
    }
}

/// Extract all containers from a PodSpec (containers, init containers and
/// ephemeral containers).
pub fn all_containers(spec: &PodSpec) -> Vec<ContainerView<'_>> {
    let mut containers: Vec<ContainerView<'_>> =
        spec.containers.iter().map(ContainerView::from).collect();
    containers.extend(
        spec.init_containers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ContainerView::from),
    );
    containers.extend(
        spec.ephemeral_containers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ContainerView::from),
    );
    containers
}
