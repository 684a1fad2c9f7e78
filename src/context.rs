//! Launch context for argument resolution
//!
//! Holds the launch configuration map for a single assembly. The context is
//! seeded with caller overrides; declaring an argument fills in its default
//! only where no override was supplied, so overrides always win. Each
//! assembly gets its own context, preventing state leakage between runs.

use crate::{
    error::AssemblyError,
    record::LaunchArgument,
};
use std::collections::HashMap;

/// Context for resolving launch configurations during one assembly.
#[derive(Debug, Default)]
pub struct LaunchContext {
    configurations: HashMap<String, String>,
}

impl LaunchContext {
    /// Create a context seeded with caller-supplied overrides.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self {
            configurations: overrides,
        }
    }

    /// Declare an argument. Its default value populates the context unless
    /// the caller already supplied an override for the same name.
    pub fn declare(&mut self, argument: &LaunchArgument) {
        if self.configurations.contains_key(&argument.name) {
            log::debug!(
                "Launch argument '{}' overridden by caller",
                argument.name
            );
            return;
        }
        if let Some(default) = &argument.default {
            self.configurations
                .insert(argument.name.clone(), default.clone());
        }
    }

    /// Get a launch configuration value by name.
    pub fn get_configuration(&self, name: &str) -> Option<&String> {
        self.configurations.get(name)
    }

    /// Set a launch configuration value directly.
    pub fn set_configuration(&mut self, name: String, value: String) {
        self.configurations.insert(name, value);
    }

    /// Resolve a required configuration, failing if it was never set.
    pub fn resolve(&self, name: &str) -> Result<String, AssemblyError> {
        self.configurations
            .get(name)
            .cloned()
            .ok_or_else(|| AssemblyError::MissingArgument(name.to_string()))
    }

    /// Resolve a configuration, falling back to the lookup-site default.
    ///
    /// The fallback only applies when the name was neither overridden nor
    /// filled in by a declaration.
    pub fn resolve_or(&self, name: &str, fallback: &str) -> String {
        self.configurations
            .get(name)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}
