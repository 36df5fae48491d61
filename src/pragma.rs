//! Annotation-based check disabling.
//!
//! An object opts out of checks with
//! `cluster-lint.io/disabled-checks: "check-a,check-b"`.

use crate::objects::Objects;
use crate::types::Diagnostic;
use std::collections::{BTreeMap, HashSet};

/// Annotation listing the checks disabled for an object.
pub const DISABLED_CHECKS_ANNOTATION: &str = "cluster-lint.io/disabled-checks";

/// Extract the set of disabled check names from an object's annotations.
pub fn disabled_checks(annotations: &BTreeMap<String, String>) -> HashSet<&str> {
    annotations
        .get(DISABLED_CHECKS_ANNOTATION)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the diagnostic's object disabled the check that produced it.
pub fn is_suppressed(objects: &Objects, diagnostic: &Diagnostic) -> bool {
    objects
        .annotations(diagnostic.kind, &diagnostic.object)
        .is_some_and(|annotations| disabled_checks(annotations).contains(diagnostic.check.as_str()))
}
