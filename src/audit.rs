//! The detection pipeline.
//!
//! Root manifest → workspace discovery → installed-package scan → demand
//! aggregation → classification → cache → ignore filter.

use std::path::{Path, PathBuf};

use crate::cache::CacheStore;
use crate::demand::aggregate_demands;
use crate::error::Result;
use crate::issue::{classify_all, filter_ignored, Issue};
use crate::manifest::read_root_manifest;
use crate::registry::Registry;
use crate::resolver::Strategy;
use crate::scanner::scan_all;
use crate::workspace::package_paths;

/// Options controlling one detection run.
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// How competing ranges are reconciled.
    pub strategy: Strategy,
    /// Packages removed from the result.
    pub ignore: Vec<String>,
    /// Whether the cache is read and written.
    pub use_cache: bool,
}

/// Runs peer-dependency detection for one project.
pub struct Auditor<'a> {
    root: PathBuf,
    registry: &'a dyn Registry,
    options: AuditOptions,
}

impl<'a> Auditor<'a> {
    /// Create an auditor for the project at `root`.
    pub fn new(root: impl Into<PathBuf>, registry: &'a dyn Registry, options: AuditOptions) -> Self {
        Self {
            root: root.into(),
            registry,
            options,
        }
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the run options.
    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Get the registry used for latest-version lookups.
    pub fn registry(&self) -> &'a dyn Registry {
        self.registry
    }

    /// Detect issues, answering from the cache when it is still valid.
    pub fn run(&self) -> Result<Vec<Issue>> {
        self.detect(self.options.use_cache)
    }

    /// Detect issues from scratch, ignoring any cached result.
    ///
    /// The cache entry is still refreshed when caching is enabled.
    pub fn run_fresh(&self) -> Result<Vec<Issue>> {
        self.detect(false)
    }

    fn detect(&self, read_cache: bool) -> Result<Vec<Issue>> {
        let manifest = read_root_manifest(&self.root)?;
        let cache = CacheStore::new(&self.root);

        if read_cache {
            if let Some(issues) = cache.read()? {
                return Ok(filter_ignored(issues, &self.options.ignore));
            }
        }

        let paths = package_paths(&self.root, &manifest);
        tracing::debug!("Scanning {} package path(s)", paths.len());

        let installed = scan_all(&paths)?;
        let demands = aggregate_demands(&paths)?;
        let issues = classify_all(&demands, &installed, self.registry, self.options.strategy);

        if self.options.use_cache {
            cache.write(&issues)?;
        }

        Ok(filter_ignored(issues, &self.options.ignore))
    }
}
