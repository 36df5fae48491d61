//! Core value types for cluster-lint.
//!
//! - `Severity` - how urgently a finding needs attention
//! - `ObjectKind` - the resource-kind tag a diagnostic is about
//! - `ObjectRef` - name and namespace of the offending object
//! - `Diagnostic` - a single finding produced by a check

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Severity levels for diagnostics.
///
/// Ordered by decreasing urgency: `Error > Warning > Suggestion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed.
    Error,
    /// Should be addressed.
    #[default]
    Warning,
    /// Worth considering.
    Suggestion,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "suggestion" => Some(Self::Suggestion),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Suggestion => "suggestion",
        }
    }

    fn urgency(&self) -> u8 {
        match self {
            Self::Error => 2,
            Self::Warning => 1,
            Self::Suggestion => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.urgency().cmp(&other.urgency())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Resource kinds a diagnostic can be about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    // Core
    Pod,
    PodTemplate,
    Secret,
    ConfigMap,
    PersistentVolume,
    PersistentVolumeClaim,
    Service,
    ServiceAccount,
    Namespace,

    // Workloads
    Deployment,
    StatefulSet,
    DaemonSet,
    ReplicaSet,
    Job,
    CronJob,

    // Networking
    Ingress,
}

impl ObjectKind {
    /// Get the string representation matching Kubernetes kind names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::PodTemplate => "PodTemplate",
            Self::Secret => "Secret",
            Self::ConfigMap => "ConfigMap",
            Self::PersistentVolume => "PersistentVolume",
            Self::PersistentVolumeClaim => "PersistentVolumeClaim",
            Self::Service => "Service",
            Self::ServiceAccount => "ServiceAccount",
            Self::Namespace => "Namespace",
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::DaemonSet => "DaemonSet",
            Self::ReplicaSet => "ReplicaSet",
            Self::Job => "Job",
            Self::CronJob => "CronJob",
            Self::Ingress => "Ingress",
        }
    }

    /// Parse from a Kubernetes kind string.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "Pod" => Some(Self::Pod),
            "PodTemplate" => Some(Self::PodTemplate),
            "Secret" => Some(Self::Secret),
            "ConfigMap" => Some(Self::ConfigMap),
            "PersistentVolume" => Some(Self::PersistentVolume),
            "PersistentVolumeClaim" => Some(Self::PersistentVolumeClaim),
            "Service" => Some(Self::Service),
            "ServiceAccount" => Some(Self::ServiceAccount),
            "Namespace" => Some(Self::Namespace),
            "Deployment" => Some(Self::Deployment),
            "StatefulSet" => Some(Self::StatefulSet),
            "DaemonSet" => Some(Self::DaemonSet),
            "ReplicaSet" => Some(Self::ReplicaSet),
            "Job" => Some(Self::Job),
            "CronJob" => Some(Self::CronJob),
            "Ingress" => Some(Self::Ingress),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a Kubernetes object: its name and, for namespaced kinds, its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectRef {
    /// Create a reference to a namespaced object.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Create a reference to a cluster-scoped object.
    pub fn cluster_scoped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Take the identity out of an object's metadata.
    pub fn from_meta(meta: &ObjectMeta) -> Self {
        Self {
            name: meta.name.clone().unwrap_or_default(),
            namespace: meta.namespace.clone(),
        }
    }

    /// `namespace/name`, or just `name` for cluster-scoped objects.
    pub fn identifier(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// A finding produced by a check.
///
/// Diagnostics are plain values: two diagnostics are equal when every field
/// is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the check that produced this diagnostic.
    pub check: String,
    pub severity: Severity,
    pub message: String,
    /// Kind of the offending object.
    pub kind: ObjectKind,
    /// Identity of the offending object.
    pub object: ObjectRef,
    /// Who is responsible for remediation. Set by the check, not the object.
    pub owners: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no owners.
    pub fn new(
        check: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        kind: ObjectKind,
        object: ObjectRef,
    ) -> Self {
        Self {
            check: check.into(),
            severity,
            message: message.into(),
            kind,
            object,
            owners: Vec::new(),
        }
    }

    /// Set the owners.
    pub fn with_owners(mut self, owners: &[&str]) -> Self {
        self.owners = owners.iter().map(|o| (*o).to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Suggestion);
        assert_eq!(
            [Severity::Suggestion, Severity::Error, Severity::Warning]
                .iter()
                .max(),
            Some(&Severity::Error)
        );
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("WARNING"), Some(Severity::Warning));
        assert_eq!(Severity::parse("Suggestion"), Some(Severity::Suggestion));
        assert_eq!(Severity::parse("info"), None);
    }

    #[test]
    fn test_object_kind_round_trip_names() {
        assert_eq!(ObjectKind::from_kind("Secret"), Some(ObjectKind::Secret));
        assert_eq!(ObjectKind::Secret.to_string(), "Secret");
        assert_eq!(ObjectKind::from_kind("Widget"), None);
    }

    #[test]
    fn test_object_ref_from_meta() {
        let meta = ObjectMeta {
            name: Some("secret_foo".to_string()),
            namespace: Some("k8s".to_string()),
            ..Default::default()
        };
        let r = ObjectRef::from_meta(&meta);
        assert_eq!(r, ObjectRef::new("secret_foo", "k8s"));
        assert_eq!(r.identifier(), "k8s/secret_foo");
        assert_eq!(ObjectRef::cluster_scoped("pv-1").identifier(), "pv-1");
    }

    #[test]
    fn test_diagnostic_equality_is_by_value() {
        let a = Diagnostic::new(
            "unused-secret",
            Severity::Warning,
            "Unused secret",
            ObjectKind::Secret,
            ObjectRef::new("s", "ns"),
        )
        .with_owners(&["platform"]);
        let b = a.clone();
        assert_eq!(a, b);

        let c = Diagnostic {
            severity: Severity::Error,
            ..b
        };
        assert_ne!(a, c);
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let d = Diagnostic::new(
            "bare-pods",
            Severity::Suggestion,
            "msg",
            ObjectKind::Pod,
            ObjectRef::cluster_scoped("p"),
        );
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["severity"], "suggestion");
        assert_eq!(json["kind"], "Pod");
        assert_eq!(json["object"]["name"], "p");
        assert!(json["object"].get("namespace").is_none());
    }
}
