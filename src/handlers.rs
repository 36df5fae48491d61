//! Command handlers for the `cluster-lint` binary.

use crate::checks::registry;
use crate::cli::RunOptions;
use crate::config::LintConfig;
use crate::formatter;
use crate::lint::lint_source;
use crate::loader::ManifestSource;
use crate::Result;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Render the check catalogue, optionally filtered by group.
pub fn handle_list(groups: &[String]) -> Result<String> {
    let registry = registry::builtin()?;
    let known = registry.groups();
    if let Some(unknown) = groups.iter().find(|g| !known.contains(g.as_str())) {
        return Err(crate::checks::RegistryError::UnknownGroup(unknown.clone()).into());
    }

    let filter: Vec<&str> = groups.iter().map(String::as_str).collect();
    let checks = registry.list(&filter);
    let width = checks.iter().map(|c| c.name().len()).max().unwrap_or(0);

    let mut output = String::new();
    for check in checks {
        let _ = writeln!(
            output,
            "{:<width$}  [{}]  {}",
            check.name(),
            check.groups().join(", "),
            check.description(),
            width = width
        );
    }
    Ok(output)
}

/// Lint the snapshot at `path`. Returns the rendered report and whether
/// the run failed.
pub fn handle_run(
    path: PathBuf,
    options: RunOptions,
    config_path: Option<&Path>,
) -> Result<(String, bool)> {
    let config = apply_options(load_config(config_path)?, &options);
    let source = ManifestSource::new(path);

    let result = lint_source(&source, registry::builtin()?, &config)?;
    let rendered = formatter::format_result_to_string(&result, options.output);
    Ok((rendered, result.should_fail(&config)))
}

/// The explicit config file, else a default file in the working directory,
/// else defaults.
fn load_config(config_path: Option<&Path>) -> Result<LintConfig> {
    if let Some(path) = config_path {
        return Ok(LintConfig::load_from_file(path)?);
    }
    let cwd = std::env::current_dir()?;
    Ok(LintConfig::load_from_default(&cwd)?.unwrap_or_default())
}

/// Overlay command-line options on a loaded configuration.
fn apply_options(mut config: LintConfig, options: &RunOptions) -> LintConfig {
    if !options.checks.is_empty() {
        config.checks = options.checks.clone();
    }
    if !options.exclude_checks.is_empty() {
        config.exclude_checks = options.exclude_checks.clone();
    }
    if !options.groups.is_empty() {
        config.groups = options.groups.clone();
    }
    if !options.exclude_groups.is_empty() {
        config.exclude_groups = options.exclude_groups.clone();
    }
    config
        .ignore_namespaces
        .extend(options.ignore_namespaces.iter().cloned());
    if let Some(severity) = options.min_severity {
        config.minimum_severity = severity;
    }
    if let Some(threshold) = options.failure_threshold {
        config.failure_threshold = threshold;
    }
    config.no_fail |= options.no_fail;
    config
}
