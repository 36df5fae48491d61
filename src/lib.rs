//! # cluster-lint
//!
//! A linter for Kubernetes cluster snapshots. Checks run against an
//! immutable snapshot of the cluster's resources and report best-practice
//! violations as structured diagnostics. Nothing is ever written back to
//! the cluster.
//!
//! ## Features
//!
//! - **Pluggable checks**: every check implements [`checks::Check`] and is
//!   registered once in a frozen [`checks::Registry`]
//! - **Failure isolation**: the [`executor::Executor`] runs checks in
//!   parallel; a failing or panicking check never hides the others' results
//! - **Reference resolution**: unused secrets, config maps and volume claims
//! - **Configuration**: `.cluster-lint.yaml`, namespace globs and
//!   per-object `cluster-lint.io/disabled-checks` annotations
//!
//! ## Example
//!
//! ```rust,no_run
//! use cluster_lint::{LintConfig, ManifestSource, lint_source, registry};
//!
//! # fn main() -> cluster_lint::Result<()> {
//! let source = ManifestSource::new("snapshot.yaml");
//! let result = lint_source(&source, registry::builtin()?, &LintConfig::default())?;
//! for d in &result.diagnostics {
//!     println!("{} {}: {}", d.check, d.object, d.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod extract;
pub mod formatter;
pub mod handlers;
pub mod lint;
pub mod loader;
pub mod objects;
pub mod pragma;
pub mod types;

// Re-export commonly used types and functions
pub use checks::{Check, CheckError, CheckResult, Registry, RegistryBuilder, RegistryError, registry};
pub use config::{ConfigError, LintConfig};
pub use error::{ClusterLintError, Result};
pub use executor::{Executor, Report};
pub use lint::{LintResult, LintSummary, lint, lint_source};
pub use loader::{LoadError, ManifestSource, SnapshotSource};
pub use objects::{MissingList, Objects, ObjectsBuilder};
pub use types::{Diagnostic, ObjectKind, ObjectRef, Severity};
