//! Plain text formatter.

use crate::lint::LintResult;
use crate::types::Severity;
use std::fmt::Write;

/// Format a lint result as plain text.
pub fn format(result: &LintResult) -> String {
    let mut output = String::new();

    for d in &result.diagnostics {
        let _ = writeln!(
            output,
            "[{}] {} {}/{}: {}",
            d.severity, d.check, d.kind, d.object, d.message
        );
    }

    for (check, error) in &result.errors {
        let _ = writeln!(output, "[check error] {}: {}", check, error);
    }

    if result.diagnostics.is_empty() {
        output.push_str("No issues found.\n");
    } else {
        let _ = writeln!(
            output,
            "\nFound {} issue(s): {} error(s), {} warning(s), {} suggestion(s).",
            result.diagnostics.len(),
            result.count(Severity::Error),
            result.count(Severity::Warning),
            result.count(Severity::Suggestion),
        );
    }
    if !result.errors.is_empty() {
        let _ = writeln!(output, "{} check(s) failed to run.", result.errors.len());
    }

    output
}
