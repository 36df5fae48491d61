//! Configuration for cluster-lint.
//!
//! Loaded from `.cluster-lint.yaml` (camelCase keys):
//! - check and group selection
//! - namespaces to ignore (glob patterns)
//! - minimum reported severity and failure threshold

use crate::checks::Selection;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names searched by `load_from_default`, in order.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[".cluster-lint.yaml", ".cluster-lint.yml"];

/// Configuration for a lint run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintConfig {
    /// Checks to run. When set, group selection is ignored.
    pub checks: Vec<String>,

    /// Checks never to run.
    pub exclude_checks: Vec<String>,

    /// Groups to run. Empty means all groups.
    pub groups: Vec<String>,

    /// Groups never to run.
    pub exclude_groups: Vec<String>,

    /// Glob patterns for namespaces whose diagnostics are dropped.
    pub ignore_namespaces: Vec<String>,

    /// Diagnostics below this severity are not reported.
    pub minimum_severity: Severity,

    /// Reported diagnostics at or above this severity fail the run.
    pub failure_threshold: Severity,

    /// If true, never fail the run because of diagnostics.
    pub no_fail: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            checks: Vec::new(),
            exclude_checks: Vec::new(),
            groups: Vec::new(),
            exclude_groups: Vec::new(),
            ignore_namespaces: Vec::new(),
            minimum_severity: Severity::Suggestion,
            failure_threshold: Severity::Warning,
            no_fail: false,
        }
    }
}

impl LintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check to run.
    pub fn check(mut self, name: impl Into<String>) -> Self {
        self.checks.push(name.into());
        self
    }

    /// Add a check to skip.
    pub fn exclude_check(mut self, name: impl Into<String>) -> Self {
        self.exclude_checks.push(name.into());
        self
    }

    /// Add a group to run.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Add a group to skip.
    pub fn exclude_group(mut self, group: impl Into<String>) -> Self {
        self.exclude_groups.push(group.into());
        self
    }

    /// Add a namespace pattern to ignore.
    pub fn ignore_namespace(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_namespaces.push(pattern.into());
        self
    }

    /// Set the minimum reported severity.
    pub fn with_minimum_severity(mut self, severity: Severity) -> Self {
        self.minimum_severity = severity;
        self
    }

    /// Set the failure threshold.
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// The check selection this configuration describes.
    pub fn selection(&self) -> Selection {
        Selection {
            checks: self.checks.clone(),
            exclude_checks: self.exclude_checks.clone(),
            groups: self.groups.clone(),
            exclude_groups: self.exclude_groups.clone(),
        }
    }

    /// Whether diagnostics in this namespace are dropped.
    ///
    /// Patterns that fail to compile as globs match literally.
    pub fn should_ignore_namespace(&self, namespace: &str) -> bool {
        self.ignore_namespaces
            .iter()
            .any(|pattern| match glob::Pattern::new(pattern) {
                Ok(glob) => glob.matches(namespace),
                Err(_) => pattern == namespace,
            })
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Load configuration from a YAML string. Empty input yields defaults.
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from the first default file present in `dir`.
    ///
    /// Returns `Ok(None)` when no default file exists.
    pub fn load_from_default(dir: &Path) -> Result<Option<Self>, ConfigError> {
        for filename in DEFAULT_CONFIG_FILES {
            let path = dir.join(filename);
            if path.is_file() {
                log::debug!("loading config from {}", path.display());
                return Self::load_from_file(&path).map(Some);
            }
        }
        Ok(None)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for `LintConfig`.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
