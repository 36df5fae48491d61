//! Snapshot loading from Kubernetes manifests.
//!
//! A manifest file holds one or more YAML documents (or one JSON document).
//! `List` documents, as produced by `kubectl get -o yaml`, are flattened.
//! Documents of kinds the snapshot does not model, or at an `apiVersion`
//! other than the one it models, are skipped.

use crate::objects::Objects;
use crate::types::ObjectKind;
use k8s_openapi::Resource;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Anything that can produce a cluster snapshot.
pub trait SnapshotSource {
    /// Produce a snapshot. Every list of a loaded snapshot is present.
    fn load(&self) -> Result<Objects, LoadError>;
}

/// Errors raised while loading manifests.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("YAML syntax error in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON syntax error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {kind} {name:?} in {}: {source}", path.display())]
    Object {
        path: PathBuf,
        kind: ObjectKind,
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a snapshot from a manifest file or a directory of manifests.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for ManifestSource {
    fn load(&self) -> Result<Objects, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::NotFound(self.path.clone()));
        }

        let mut objects = Objects::empty();
        if self.path.is_dir() {
            for entry in walkdir::WalkDir::new(&self.path)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|source| LoadError::Walk {
                    path: self.path.clone(),
                    source,
                })?;
                if entry.file_type().is_file() && is_manifest(entry.path()) {
                    load_file(entry.path(), &mut objects)?;
                }
            }
        } else {
            load_file(&self.path, &mut objects)?;
        }

        log::info!(
            "loaded {} object(s) from {}",
            objects.len(),
            self.path.display()
        );
        Ok(objects)
    }
}

/// Parse a YAML string (one or more documents) into a snapshot.
pub fn load_str(content: &str) -> Result<Objects, LoadError> {
    let mut objects = Objects::empty();
    parse_yaml(content, Path::new("<string>"), &mut objects)?;
    Ok(objects)
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

fn load_file(path: &Path, objects: &mut Objects) -> Result<(), LoadError> {
    log::debug!("reading manifests from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let document: Value = serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        add_document(document, None, path, objects)
    } else {
        parse_yaml(&content, path, objects)
    }
}

fn parse_yaml(content: &str, path: &Path, objects: &mut Objects) -> Result<(), LoadError> {
    for document in serde_yaml::Deserializer::from_str(content) {
        let document = Value::deserialize(document).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        add_document(document, None, path, objects)?;
    }
    Ok(())
}

/// Route one document into its list. `implied_kind` names the kind of
/// items in a typed list (`SecretList` items carry no `kind`).
fn add_document(
    document: Value,
    implied_kind: Option<&str>,
    path: &Path,
    objects: &mut Objects,
) -> Result<(), LoadError> {
    if document.is_null() {
        return Ok(());
    }

    let kind = document
        .get("kind")
        .and_then(Value::as_str)
        .or(implied_kind)
        .unwrap_or_default()
        .to_string();

    if kind.ends_with("List") {
        let item_kind = kind.strip_suffix("List").filter(|k| !k.is_empty());
        let items = match document {
            Value::Object(mut map) => map.remove("items"),
            _ => None,
        };
        if let Some(Value::Array(items)) = items {
            for item in items {
                add_document(item, item_kind, path, objects)?;
            }
        }
        return Ok(());
    }

    let Some(object_kind) = ObjectKind::from_kind(&kind) else {
        log::debug!("skipping unsupported kind {:?} in {}", kind, path.display());
        return Ok(());
    };

    let name = document
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let invalid = |source| LoadError::Object {
        path: path.to_path_buf(),
        kind: object_kind,
        name: name.clone(),
        source,
    };

    match object_kind {
        ObjectKind::Pod => push(&mut objects.pods, document, path),
        ObjectKind::PodTemplate => push(&mut objects.pod_templates, document, path),
        ObjectKind::Secret => push(&mut objects.secrets, document, path),
        ObjectKind::ConfigMap => push(&mut objects.config_maps, document, path),
        ObjectKind::PersistentVolume => push(&mut objects.persistent_volumes, document, path),
        ObjectKind::PersistentVolumeClaim => {
            push(&mut objects.persistent_volume_claims, document, path)
        }
        ObjectKind::Service => push(&mut objects.services, document, path),
        ObjectKind::ServiceAccount => push(&mut objects.service_accounts, document, path),
        ObjectKind::Namespace => push(&mut objects.namespaces, document, path),
        ObjectKind::Deployment => push(&mut objects.deployments, document, path),
        ObjectKind::StatefulSet => push(&mut objects.stateful_sets, document, path),
        ObjectKind::DaemonSet => push(&mut objects.daemon_sets, document, path),
        ObjectKind::ReplicaSet => push(&mut objects.replica_sets, document, path),
        ObjectKind::Job => push(&mut objects.jobs, document, path),
        ObjectKind::CronJob => push(&mut objects.cron_jobs, document, path),
        ObjectKind::Ingress => push(&mut objects.ingresses, document, path),
    }
    .map_err(invalid)
}

/// Deserialize `document` into `list`. Items of a typed list may omit
/// `apiVersion`; any other version than `T`'s is skipped.
fn push<T: DeserializeOwned + Resource>(
    list: &mut Option<Vec<T>>,
    document: Value,
    path: &Path,
) -> Result<(), serde_json::Error> {
    if let Some(api_version) = document.get("apiVersion").and_then(Value::as_str) {
        if api_version != T::API_VERSION {
            log::debug!(
                "skipping {} at unsupported apiVersion {:?} in {}",
                T::KIND,
                api_version,
                path.display()
            );
            return Ok(());
        }
    }
    let item = serde_json::from_value(document)?;
    list.get_or_insert_with(Vec::new).push(item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_document_yaml() {
        let yaml = r#"
apiVersion: v1
kind: Secret
metadata:
  name: db-password
  namespace: prod
type: Opaque
---
# comment-only documents are fine
---
apiVersion: v1
kind: Pod
metadata:
  name: web
  namespace: prod
spec:
  containers:
  - name: app
    image: nginx:1.25
    envFrom:
    - secretRef:
        name: db-password
---
apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: reader
"#;
        let objects = load_str(yaml).unwrap();
        assert_eq!(objects.secrets().unwrap().len(), 1);
        assert_eq!(objects.pods().unwrap().len(), 1);
        assert_eq!(objects.len(), 2);
        assert!(objects.config_maps().unwrap().is_empty());
    }

    #[test]
    fn test_list_is_flattened() {
        let yaml = r#"
apiVersion: v1
kind: List
items:
- apiVersion: v1
  kind: ConfigMap
  metadata:
    name: a
    namespace: ns
- apiVersion: v1
  kind: PersistentVolumeClaim
  metadata:
    name: data
    namespace: ns
---
apiVersion: v1
kind: SecretList
items:
- metadata:
    name: untyped
    namespace: ns
"#;
        let objects = load_str(yaml).unwrap();
        assert_eq!(objects.config_maps().unwrap().len(), 1);
        assert_eq!(objects.persistent_volume_claims().unwrap().len(), 1);
        let secrets = objects.secrets().unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets[0].metadata.name.as_deref(), Some("untyped"));
    }

    #[test]
    fn test_invalid_object_names_path_and_kind() {
        let yaml = r#"
apiVersion: v1
kind: Pod
metadata:
  name: broken
spec:
  containers: "not a list"
"#;
        let err = load_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::Object { kind: ObjectKind::Pod, .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_legacy_api_versions_are_skipped() {
        let yaml = r#"
apiVersion: v1
kind: Secret
metadata:
  name: tls
  namespace: ns
---
apiVersion: networking.k8s.io/v1beta1
kind: Ingress
metadata:
  name: i
  namespace: ns
spec:
  tls:
  - secretName: tls
---
apiVersion: batch/v1beta1
kind: CronJob
metadata:
  name: nightly
  namespace: ns
---
apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: current
  namespace: ns
"#;
        let objects = load_str(yaml).unwrap();
        assert_eq!(objects.secrets().unwrap().len(), 1);
        assert!(objects.cron_jobs().unwrap().is_empty());

        let ingresses = objects.ingresses().unwrap();
        assert_eq!(ingresses.len(), 1);
        assert_eq!(ingresses[0].metadata.name.as_deref(), Some("current"));
    }

    #[test]
    fn test_cluster_scoped_and_service_kinds_are_loaded() {
        let yaml = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: prod
---
apiVersion: v1
kind: PersistentVolume
metadata:
  name: pv-0001
---
apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: prod
"#;
        let objects = load_str(yaml).unwrap();
        assert_eq!(objects.namespaces().unwrap().len(), 1);
        assert_eq!(objects.persistent_volumes().unwrap().len(), 1);
        assert_eq!(objects.services().unwrap().len(), 1);
        assert_eq!(objects.len(), 3);
    }

    #[test]
    fn test_syntax_error() {
        let err = load_str("kind: [unclosed").unwrap_err();
        assert!(matches!(err, LoadError::Yaml { .. }));
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("secret.yaml"),
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\n  namespace: ns\n",
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested").join("pod.json"),
            r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "p", "namespace": "ns"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), "not a manifest").unwrap();

        let objects = ManifestSource::new(dir.path()).load().unwrap();
        assert_eq!(objects.secrets().unwrap().len(), 1);
        assert_eq!(objects.pods().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_path() {
        let err = ManifestSource::new("/nonexistent/cluster.yaml")
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
