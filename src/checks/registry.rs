//! The check registry.
//!
//! Checks are registered once through a `RegistryBuilder`, which is then
//! frozen into a read-only `Registry`. A `Registry` has no way to add
//! checks, so nothing can be registered once linting has started.

use crate::checks::{Check, basic, security};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Registry lookup and registration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A check with this name is already registered.
    #[error("check '{0}' is already registered")]
    DuplicateName(String),

    /// No check with this name is registered.
    #[error("unknown check '{0}'")]
    NotFound(String),

    /// No registered check carries this group.
    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    /// A name was both included and excluded.
    #[error("'{0}' cannot be both included and excluded")]
    Conflict(String),

    /// The selection resolved to no checks at all.
    #[error("no checks selected")]
    EmptySelection,
}

type CheckMap = BTreeMap<&'static str, Arc<dyn Check>>;

/// Collects checks during startup.
#[derive(Default)]
pub struct RegistryBuilder {
    checks: CheckMap,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check. Fails without side effects if the name is taken.
    pub fn register<C: Check + 'static>(&mut self, check: C) -> Result<(), RegistryError> {
        let name = check.name();
        if self.checks.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        self.checks.insert(name, Arc::new(check));
        Ok(())
    }

    /// Freeze the catalogue.
    pub fn build(self) -> Registry {
        Registry {
            checks: self.checks,
        }
    }
}

/// Which checks to run, by name and by group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Checks to run. When non-empty, groups are ignored.
    pub checks: Vec<String>,
    /// Checks never to run.
    pub exclude_checks: Vec<String>,
    /// Groups to run. Empty means every group.
    pub groups: Vec<String>,
    /// Groups never to run. Only filters group-derived selections.
    pub exclude_groups: Vec<String>,
}

/// The read-only catalogue of known checks, ordered by name.
pub struct Registry {
    checks: CheckMap,
}

impl Registry {
    /// Get a check by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Check>, RegistryError> {
        self.checks
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// List checks, ordered by name. With a non-empty filter only checks
    /// carrying at least one of the given groups are returned.
    pub fn list(&self, groups: &[&str]) -> Vec<Arc<dyn Check>> {
        self.checks
            .values()
            .filter(|check| groups.is_empty() || groups.iter().any(|g| check.in_group(g)))
            .cloned()
            .collect()
    }

    /// Every group carried by at least one check.
    pub fn groups(&self) -> BTreeSet<&'static str> {
        self.checks
            .values()
            .flat_map(|check| check.groups().iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Resolve a selection to the checks it names, ordered by name.
    pub fn select(&self, selection: &Selection) -> Result<Vec<Arc<dyn Check>>, RegistryError> {
        if let Some(name) = overlap(&selection.checks, &selection.exclude_checks) {
            return Err(RegistryError::Conflict(name.to_string()));
        }
        if let Some(group) = overlap(&selection.groups, &selection.exclude_groups) {
            return Err(RegistryError::Conflict(group.to_string()));
        }

        for name in selection.checks.iter().chain(&selection.exclude_checks) {
            self.get(name)?;
        }
        let known_groups = self.groups();
        for group in selection.groups.iter().chain(&selection.exclude_groups) {
            if !known_groups.contains(group.as_str()) {
                return Err(RegistryError::UnknownGroup(group.clone()));
            }
        }

        let selected: Vec<Arc<dyn Check>> = if selection.checks.is_empty() {
            let groups: Vec<&str> = selection.groups.iter().map(String::as_str).collect();
            self.list(&groups)
                .into_iter()
                .filter(|check| !selection.exclude_groups.iter().any(|g| check.in_group(g)))
                .filter(|check| !selection.exclude_checks.iter().any(|c| c == check.name()))
                .collect()
        } else {
            self.checks
                .iter()
                .filter(|(name, _)| selection.checks.iter().any(|c| c == *name))
                .map(|(_, check)| Arc::clone(check))
                .collect()
        };

        if selected.is_empty() {
            return Err(RegistryError::EmptySelection);
        }
        Ok(selected)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.checks.keys()).finish()
    }
}

fn overlap<'a>(included: &'a [String], excluded: &[String]) -> Option<&'a str> {
    included
        .iter()
        .find(|name| excluded.contains(name))
        .map(String::as_str)
}

/// Register every built-in check.
pub fn register_builtin(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    basic::register(builder)?;
    security::register(builder)?;
    Ok(())
}

/// Process-wide registry of built-in checks, built on first access.
static BUILTIN: OnceLock<Result<Registry, RegistryError>> = OnceLock::new();

/// Get the built-in registry, building it if needed.
pub fn builtin() -> Result<&'static Registry, RegistryError> {
    BUILTIN
        .get_or_init(|| {
            let mut builder = RegistryBuilder::new();
            register_builtin(&mut builder)?;
            let registry = builder.build();
            log::debug!("registered {} built-in checks", registry.len());
            Ok(registry)
        })
        .as_ref()
        .map_err(Clone::clone)
}
