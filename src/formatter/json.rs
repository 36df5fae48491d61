//! JSON formatter.

use crate::lint::LintResult;
use crate::types::Diagnostic;
use serde::Serialize;
use std::collections::BTreeMap;

/// Format a lint result as JSON.
pub fn format(result: &LintResult) -> String {
    let output = JsonOutput::from(result);
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: &'a [Diagnostic],
    errors: BTreeMap<&'a str, String>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    objects_analyzed: usize,
    checks_run: usize,
    total_diagnostics: usize,
    suppressed: usize,
    passed: bool,
}

impl<'a> From<&'a LintResult> for JsonOutput<'a> {
    fn from(result: &'a LintResult) -> Self {
        Self {
            diagnostics: &result.diagnostics,
            errors: result
                .errors
                .iter()
                .map(|(check, error)| (check.as_str(), error.to_string()))
                .collect(),
            summary: JsonSummary {
                objects_analyzed: result.summary.objects_analyzed,
                checks_run: result.summary.checks_run,
                total_diagnostics: result.diagnostics.len(),
                suppressed: result.summary.suppressed,
                passed: result.summary.passed,
            },
        }
    }
}
