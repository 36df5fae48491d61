//! The cluster snapshot checks run against.
//!
//! `Objects` holds one typed list per resource kind. A list is either present
//! (possibly empty) or absent, the latter meaning whoever built the snapshot
//! never supplied it. Checks read lists through accessors that turn an absent
//! list into a `MissingList` error.

use crate::types::{ObjectKind, ObjectRef};
use k8s_openapi::Metadata;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, PersistentVolume, PersistentVolumeClaim, Pod, PodTemplate, Secret,
    Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// A resource list the snapshot does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("snapshot has no {0} list")]
pub struct MissingList(pub &'static str);

macro_rules! snapshot_lists {
    ($($field:ident: $ty:ty => $label:literal),* $(,)?) => {
        /// An immutable, in-memory capture of a cluster's resource lists.
        #[derive(Debug, Clone, Default)]
        pub struct Objects {
            $(pub(crate) $field: Option<Vec<$ty>>,)*
        }

        impl Objects {
            /// A snapshot with every list present and empty.
            pub fn empty() -> Self {
                Self {
                    $($field: Some(Vec::new()),)*
                }
            }

            $(
                #[doc = concat!("The ", $label, " list.")]
                pub fn $field(&self) -> Result<&[$ty], MissingList> {
                    self.$field.as_deref().ok_or(MissingList($label))
                }
            )*

            /// Total number of objects across all present lists.
            pub fn len(&self) -> usize {
                0 $(+ self.$field.as_ref().map_or(0, Vec::len))*
            }

            /// Whether no present list holds any object.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl ObjectsBuilder {
            /// Mark every list not set so far as present and empty.
            pub fn fill_missing(mut self) -> Self {
                $(self.objects.$field.get_or_insert_with(Vec::new);)*
                self
            }

            $(
                #[doc = concat!("Set the ", $label, " list.")]
                pub fn $field(mut self, items: Vec<$ty>) -> Self {
                    self.objects.$field = Some(items);
                    self
                }
            )*
        }
    };
}

snapshot_lists! {
    pods: Pod => "pods",
    pod_templates: PodTemplate => "pod templates",
    secrets: Secret => "secrets",
    config_maps: ConfigMap => "config maps",
    persistent_volumes: PersistentVolume => "persistent volumes",
    persistent_volume_claims: PersistentVolumeClaim => "persistent volume claims",
    services: Service => "services",
    service_accounts: ServiceAccount => "service accounts",
    namespaces: Namespace => "namespaces",
    deployments: Deployment => "deployments",
    stateful_sets: StatefulSet => "stateful sets",
    daemon_sets: DaemonSet => "daemon sets",
    replica_sets: ReplicaSet => "replica sets",
    jobs: Job => "jobs",
    cron_jobs: CronJob => "cron jobs",
    ingresses: Ingress => "ingresses",
}

impl Objects {
    /// Start a snapshot with every list absent.
    pub fn builder() -> ObjectsBuilder {
        ObjectsBuilder::default()
    }

    /// Look up an object's annotations by kind and identity.
    pub fn annotations(
        &self,
        kind: ObjectKind,
        object: &ObjectRef,
    ) -> Option<&BTreeMap<String, String>> {
        let meta = match kind {
            ObjectKind::Pod => find_meta(self.pods.as_deref(), object),
            ObjectKind::PodTemplate => find_meta(self.pod_templates.as_deref(), object),
            ObjectKind::Secret => find_meta(self.secrets.as_deref(), object),
            ObjectKind::ConfigMap => find_meta(self.config_maps.as_deref(), object),
            ObjectKind::PersistentVolume => find_meta(self.persistent_volumes.as_deref(), object),
            ObjectKind::PersistentVolumeClaim => {
                find_meta(self.persistent_volume_claims.as_deref(), object)
            }
            ObjectKind::Service => find_meta(self.services.as_deref(), object),
            ObjectKind::ServiceAccount => find_meta(self.service_accounts.as_deref(), object),
            ObjectKind::Namespace => find_meta(self.namespaces.as_deref(), object),
            ObjectKind::Deployment => find_meta(self.deployments.as_deref(), object),
            ObjectKind::StatefulSet => find_meta(self.stateful_sets.as_deref(), object),
            ObjectKind::DaemonSet => find_meta(self.daemon_sets.as_deref(), object),
            ObjectKind::ReplicaSet => find_meta(self.replica_sets.as_deref(), object),
            ObjectKind::Job => find_meta(self.jobs.as_deref(), object),
            ObjectKind::CronJob => find_meta(self.cron_jobs.as_deref(), object),
            ObjectKind::Ingress => find_meta(self.ingresses.as_deref(), object),
        };
        meta.and_then(|m| m.annotations.as_ref())
    }
}

fn find_meta<'a, T>(items: Option<&'a [T]>, object: &ObjectRef) -> Option<&'a ObjectMeta>
where
    T: Metadata<Ty = ObjectMeta>,
{
    items?
        .iter()
        .map(Metadata::metadata)
        .find(|meta| ObjectRef::from_meta(meta) == *object)
}

/// Assembles an `Objects` snapshot list by list.
#[derive(Debug, Default)]
pub struct ObjectsBuilder {
    objects: Objects,
}

impl ObjectsBuilder {
    pub fn build(self) -> Objects {
        self.objects
    }
}
