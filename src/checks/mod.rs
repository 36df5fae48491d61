//! The check abstraction.
//!
//! A check is a named, grouped, described analysis that reads a snapshot and
//! produces diagnostics. Checks are stateless: running one twice against the
//! same snapshot yields the same diagnostics.

pub mod basic;
pub mod registry;
pub mod security;

use crate::objects::{MissingList, Objects};
use crate::types::Diagnostic;
use std::fmt;

pub use registry::{Registry, RegistryBuilder, RegistryError, Selection};

/// Group for general best-practice checks.
pub const GROUP_BASIC: &str = "basic";
/// Group for checks about workload privileges.
pub const GROUP_SECURITY: &str = "security";

/// Outcome of running a check.
pub type CheckResult = Result<Vec<Diagnostic>, CheckError>;

/// A single analysis over a cluster snapshot.
pub trait Check: Send + Sync + fmt::Debug {
    /// Unique name (e.g., "unused-secret").
    fn name(&self) -> &'static str;

    /// Group tags used to select subsets of checks.
    fn groups(&self) -> &'static [&'static str];

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Analyze the snapshot.
    fn run(&self, objects: &Objects) -> CheckResult;

    /// Whether this check carries the given group tag.
    fn in_group(&self, group: &str) -> bool {
        self.groups().contains(&group)
    }
}

/// Why a check could not complete.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The snapshot lacks data the check requires.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MissingList),

    /// The analysis itself failed.
    #[error("check failed: {0}")]
    Failed(String),

    /// The check panicked while running.
    #[error("check panicked: {0}")]
    Panicked(String),

    /// The check failed after producing findings that remain valid.
    #[error("{source} ({} diagnostic(s) reported before failing)", .diagnostics.len())]
    Partial {
        diagnostics: Vec<Diagnostic>,
        #[source]
        source: Box<CheckError>,
    },
}

impl CheckError {
    /// Attach findings produced before the failure.
    pub fn with_partial(self, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            return self;
        }
        match self {
            Self::Partial {
                diagnostics: mut earlier,
                source,
            } => {
                earlier.extend(diagnostics);
                Self::Partial {
                    diagnostics: earlier,
                    source,
                }
            }
            other => Self::Partial {
                diagnostics,
                source: Box::new(other),
            },
        }
    }

    /// Split into the findings that survived the failure and the cause.
    pub fn into_parts(self) -> (Vec<Diagnostic>, CheckError) {
        match self {
            Self::Partial {
                diagnostics,
                source,
            } => {
                let (mut inner, cause) = source.into_parts();
                inner.extend(diagnostics);
                (inner, cause)
            }
            other => (Vec::new(), other),
        }
    }
}
