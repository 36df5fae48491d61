//! Crate-level error type.

use crate::checks::RegistryError;
use crate::config::ConfigError;
use crate::loader::LoadError;
use thiserror::Error;

/// Errors that stop a lint run before or around check execution.
///
/// Failures of individual checks are not errors at this level; they are
/// reported per check in `LintResult::errors`.
#[derive(Debug, Error)]
pub enum ClusterLintError {
    /// The snapshot could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Check registration or selection failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cluster-lint operations.
pub type Result<T> = std::result::Result<T, ClusterLintError>;
