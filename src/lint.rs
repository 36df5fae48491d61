//! Linting orchestration.
//!
//! Ties together check selection, execution, pragmas and configuration
//! filters. Filtering happens on the executor's report, never inside it.

use crate::checks::{CheckError, Registry, RegistryError};
use crate::config::LintConfig;
use crate::executor::Executor;
use crate::loader::SnapshotSource;
use crate::objects::Objects;
use crate::pragma;
use crate::types::{Diagnostic, Severity};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Result of linting one snapshot.
#[derive(Debug, Default)]
pub struct LintResult {
    /// Reported diagnostics, most severe first.
    pub diagnostics: Vec<Diagnostic>,
    /// Check failures keyed by check name.
    pub errors: BTreeMap<String, CheckError>,
    pub summary: LintSummary,
}

/// Summary of a lint run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSummary {
    /// Number of objects in the snapshot.
    pub objects_analyzed: usize,
    /// Number of checks run.
    pub checks_run: usize,
    /// Diagnostics dropped by namespace, pragma or severity filters.
    pub suppressed: usize,
    /// Whether the run passed under the configuration it ran with.
    pub passed: bool,
}

impl LintResult {
    /// Get the maximum severity among reported diagnostics.
    pub fn max_severity(&self) -> Option<Severity> {
        self.diagnostics.iter().map(|d| d.severity).max()
    }

    /// Count reported diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Whether the run should end with a non-zero exit.
    ///
    /// A failed check fails the run, as does any reported diagnostic at or
    /// above the failure threshold. `noFail` overrides both.
    pub fn should_fail(&self, config: &LintConfig) -> bool {
        if config.no_fail {
            return false;
        }
        if !self.errors.is_empty() {
            return true;
        }
        self.max_severity()
            .is_some_and(|max| max >= config.failure_threshold)
    }

    /// Sort most severe first, then by object and check.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            (Reverse(a.severity), a.kind, &a.object, &a.check, &a.message).cmp(&(
                Reverse(b.severity),
                b.kind,
                &b.object,
                &b.check,
                &b.message,
            ))
        });
    }
}

/// Lint a snapshot with the checks the configuration selects.
pub fn lint(
    objects: &Objects,
    registry: &Registry,
    config: &LintConfig,
) -> Result<LintResult, RegistryError> {
    let checks = registry.select(&config.selection())?;
    log::info!("running {} check(s) against {} object(s)", checks.len(), objects.len());

    let report = Executor::new(objects).run(&checks);
    let produced = report.diagnostics.len();

    let mut result = LintResult {
        diagnostics: report
            .diagnostics
            .into_iter()
            .filter(|d| is_reported(objects, config, d))
            .collect(),
        errors: report.errors,
        summary: LintSummary {
            objects_analyzed: objects.len(),
            checks_run: report.checks_run,
            ..Default::default()
        },
    };

    result.summary.suppressed = produced - result.diagnostics.len();
    result.sort();
    result.summary.passed = !result.should_fail(config);
    Ok(result)
}

/// Load a snapshot from `source` and lint it.
pub fn lint_source(
    source: &dyn SnapshotSource,
    registry: &Registry,
    config: &LintConfig,
) -> crate::Result<LintResult> {
    let objects = source.load()?;
    Ok(lint(&objects, registry, config)?)
}

fn is_reported(objects: &Objects, config: &LintConfig, diagnostic: &Diagnostic) -> bool {
    if diagnostic.severity < config.minimum_severity {
        return false;
    }
    if let Some(namespace) = &diagnostic.object.namespace {
        if config.should_ignore_namespace(namespace) {
            return false;
        }
    }
    !pragma::is_suppressed(objects, diagnostic)
}
