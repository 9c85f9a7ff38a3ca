//! Package manager detection.

use std::fmt;
use std::path::Path;

/// A JavaScript package manager that can install dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

/// Lockfiles checked in priority order; the first one present wins.
const LOCKFILES: [(&str, PackageManager); 3] = [
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
];

impl PackageManager {
    /// Detect the package manager for a project by lockfile presence.
    ///
    /// Falls back to npm when no lockfile exists.
    pub fn detect(project_root: &Path) -> Self {
        LOCKFILES
            .iter()
            .find(|(lockfile, _)| project_root.join(lockfile).exists())
            .map(|(_, manager)| *manager)
            .unwrap_or_default()
    }

    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Subcommand that adds packages.
    pub fn install_subcommand(&self) -> &'static str {
        match self {
            Self::Npm => "install",
            Self::Yarn | Self::Pnpm => "add",
        }
    }

    /// Full argument list for installing `packages` (`name` or `name@version`).
    pub fn install_args(&self, packages: &[String]) -> Vec<String> {
        std::iter::once(self.install_subcommand().to_string())
            .chain(packages.iter().cloned())
            .collect()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}
