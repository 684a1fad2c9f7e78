//! Ament index lookups
//!
//! Resolves installed package share directories from an ordered list of
//! install prefixes. The environment-derived order matches how a sourced
//! ROS 2 setup exposes packages: the active distro first, then well-known
//! distro roots, then every entry of `AMENT_PREFIX_PATH`.

use crate::error::AssemblyError;
use std::path::PathBuf;

const KNOWN_DISTROS: &[&str] = &["jazzy", "iron", "humble", "galactic", "foxy"];

/// An ordered set of install prefixes to search for packages.
#[derive(Debug, Clone)]
pub struct AmentIndex {
    prefixes: Vec<PathBuf>,
}

impl AmentIndex {
    /// Build the index from the environment.
    pub fn from_env() -> Self {
        let mut prefixes = Vec::new();

        if let Ok(distro) = std::env::var("ROS_DISTRO") {
            prefixes.push(PathBuf::from(format!("/opt/ros/{}", distro)));
        }

        for distro in KNOWN_DISTROS {
            let prefix = PathBuf::from(format!("/opt/ros/{}", distro));
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }

        if let Ok(ament_path) = std::env::var("AMENT_PREFIX_PATH") {
            for entry in ament_path.split(':').filter(|p| !p.is_empty()) {
                prefixes.push(PathBuf::from(entry));
            }
        }

        Self { prefixes }
    }

    /// Build an index over explicit prefixes (used by tests and tooling).
    pub fn with_prefixes(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Resolve a package's installed share directory.
    pub fn find_package_share(&self, package: &str) -> Result<PathBuf, AssemblyError> {
        for prefix in &self.prefixes {
            let share = prefix.join("share").join(package);
            if share.is_dir() {
                log::debug!(
                    "Resolved package '{}' to {}",
                    package,
                    share.display()
                );
                return Ok(share);
            }
        }
        Err(AssemblyError::PackageNotFound(package.to_string()))
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }
}
