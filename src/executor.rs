//! Runs a set of checks against one snapshot.
//!
//! Checks run in parallel on the rayon pool. Each check writes into its own
//! outcome; outcomes are merged once every check has finished. A check that
//! fails or panics is recorded under its name and never stops the others.

use crate::checks::{Check, CheckError};
use crate::objects::Objects;
use crate::types::Diagnostic;
use rayon::prelude::*;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct Report {
    /// Every diagnostic any check returned, in no particular order.
    pub diagnostics: Vec<Diagnostic>,
    /// Failures keyed by check name.
    pub errors: BTreeMap<String, CheckError>,
    /// Number of checks that were started.
    pub checks_run: usize,
}

/// What one check left behind.
struct Outcome {
    name: &'static str,
    diagnostics: Vec<Diagnostic>,
    error: Option<CheckError>,
}

/// Runs checks against a borrowed snapshot.
pub struct Executor<'a> {
    objects: &'a Objects,
}

impl<'a> Executor<'a> {
    pub fn new(objects: &'a Objects) -> Self {
        Self { objects }
    }

    /// Run every check and merge the results.
    pub fn run(&self, checks: &[Arc<dyn Check>]) -> Report {
        let outcomes: Vec<Outcome> = checks
            .par_iter()
            .map(|check| self.run_one(check.as_ref()))
            .collect();

        let mut report = Report {
            checks_run: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            report.diagnostics.extend(outcome.diagnostics);
            if let Some(error) = outcome.error {
                report.errors.insert(outcome.name.to_string(), error);
            }
        }
        report
    }

    fn run_one(&self, check: &dyn Check) -> Outcome {
        let name = check.name();
        log::debug!("running check {}", name);

        let result = panic::catch_unwind(AssertUnwindSafe(|| check.run(self.objects)))
            .unwrap_or_else(|payload| Err(CheckError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(diagnostics) => {
                log::debug!("check {} reported {} diagnostic(s)", name, diagnostics.len());
                Outcome {
                    name,
                    diagnostics,
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("check {} failed: {}", name, err);
                let (diagnostics, cause) = err.into_parts();
                let error = if diagnostics.is_empty() {
                    cause
                } else {
                    cause.with_partial(diagnostics.clone())
                };
                Outcome {
                    name,
                    diagnostics,
                    error: Some(error),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckResult;
    use crate::types::{ObjectKind, ObjectRef, Severity};

    fn diag(check: &str, name: &str) -> Diagnostic {
        Diagnostic::new(
            check,
            Severity::Warning,
            "msg",
            ObjectKind::Secret,
            ObjectRef::new(name, "ns"),
        )
    }

    #[derive(Debug)]
    enum Behavior {
        Report(Vec<Diagnostic>),
        Fail,
        FailAfter(Vec<Diagnostic>),
        Panic,
    }

    #[derive(Debug)]
    struct Scripted {
        name: &'static str,
        behavior: Behavior,
    }

    impl Check for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn groups(&self) -> &'static [&'static str] {
            &["basic"]
        }

        fn description(&self) -> &'static str {
            "scripted check"
        }

        fn run(&self, _objects: &Objects) -> CheckResult {
            match &self.behavior {
                Behavior::Report(d) => Ok(d.clone()),
                Behavior::Fail => Err(CheckError::Failed("nope".to_string())),
                Behavior::FailAfter(d) => {
                    Err(CheckError::Failed("late".to_string()).with_partial(d.clone()))
                }
                Behavior::Panic => panic!("check exploded"),
            }
        }
    }

    fn scripted(name: &'static str, behavior: Behavior) -> Arc<dyn Check> {
        Arc::new(Scripted { name, behavior })
    }

    #[test]
    fn test_merges_all_diagnostics() {
        let objects = Objects::empty();
        let checks = vec![
            scripted("a", Behavior::Report(vec![diag("a", "x"), diag("a", "y")])),
            scripted("b", Behavior::Report(vec![diag("b", "x")])),
        ];

        let report = Executor::new(&objects).run(&checks);
        assert_eq!(report.checks_run, 2);
        assert_eq!(report.diagnostics.len(), 3);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_does_not_deduplicate() {
        let objects = Objects::empty();
        let checks = vec![
            scripted("a", Behavior::Report(vec![diag("same", "x")])),
            scripted("b", Behavior::Report(vec![diag("same", "x")])),
        ];

        let report = Executor::new(&objects).run(&checks);
        assert_eq!(report.diagnostics, vec![diag("same", "x"), diag("same", "x")]);
    }

    #[test]
    fn test_failure_isolation() {
        let objects = Objects::empty();
        let checks = vec![
            scripted("fails", Behavior::Fail),
            scripted("panics", Behavior::Panic),
            scripted("works", Behavior::Report(vec![diag("works", "x")])),
        ];

        let report = Executor::new(&objects).run(&checks);
        assert_eq!(report.checks_run, 3);
        assert_eq!(report.diagnostics, vec![diag("works", "x")]);
        assert!(matches!(report.errors.get("fails"), Some(CheckError::Failed(_))));
        assert!(matches!(
            report.errors.get("panics"),
            Some(CheckError::Panicked(msg)) if msg == "check exploded"
        ));
        assert!(!report.errors.contains_key("works"));
    }

    #[test]
    fn test_partial_diagnostics_are_kept() {
        let objects = Objects::empty();
        let checks = vec![scripted(
            "partial",
            Behavior::FailAfter(vec![diag("partial", "x")]),
        )];

        let report = Executor::new(&objects).run(&checks);
        assert_eq!(report.diagnostics, vec![diag("partial", "x")]);
        assert!(matches!(
            report.errors.get("partial"),
            Some(CheckError::Partial { .. })
        ));
    }

    #[test]
    fn test_missing_list_is_recorded_per_check() {
        let objects = Objects::default();
        let registry = crate::checks::registry::builtin().unwrap();
        let checks = vec![
            registry.get("unused-secret").unwrap(),
            registry.get("unused-pvc").unwrap(),
        ];

        let report = Executor::new(&objects).run(&checks);
        assert!(report.diagnostics.is_empty());
        assert!(matches!(
            report.errors.get("unused-secret"),
            Some(CheckError::MalformedInput(_))
        ));
        assert!(matches!(
            report.errors.get("unused-pvc"),
            Some(CheckError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_no_checks() {
        let objects = Objects::empty();
        let report = Executor::new(&objects).run(&[]);
        assert_eq!(report.checks_run, 0);
        assert!(report.diagnostics.is_empty());
    }
}
