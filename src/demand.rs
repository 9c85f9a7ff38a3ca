//! Peer-dependency demand aggregation.
//!
//! Collects every `peerDependencies` entry across the root and workspace
//! manifests, keyed by dependency name, then by the exact range string,
//! then by the requiring package. Identical ranges from different packages
//! and different ranges from the same package are all retained.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::manifest::{read_manifest, Manifest};

/// One package's requirement for a peer dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerDemand {
    pub dependency: String,
    pub version_range: String,
    pub optional: bool,
    pub required_by: String,
}

/// A demand as reported in an issue's `demandedBy` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandSource {
    pub name: String,
    pub version_range: String,
    pub optional: bool,
}

/// Requirers of one exact range, in the order they were seen.
#[derive(Debug, Clone, Default)]
struct RangeDemands {
    range: String,
    requirers: Vec<(String, bool)>,
}

/// All demands for a single dependency.
#[derive(Debug, Clone, Default)]
pub struct DependencyDemands {
    by_range: Vec<RangeDemands>,
}

impl DependencyDemands {
    fn record(&mut self, range: &str, required_by: &str, optional: bool) {
        let index = match self.by_range.iter().position(|r| r.range == range) {
            Some(index) => index,
            None => {
                self.by_range.push(RangeDemands {
                    range: range.to_string(),
                    requirers: Vec::new(),
                });
                self.by_range.len() - 1
            }
        };

        let requirers = &mut self.by_range[index].requirers;
        match requirers.iter_mut().find(|(name, _)| name == required_by) {
            Some(existing) => existing.1 = optional,
            None => requirers.push((required_by.to_string(), optional)),
        }
    }

    /// Flatten into demand sources, grouped by range in first-seen order.
    pub fn sources(&self) -> Vec<DemandSource> {
        self.by_range
            .iter()
            .flat_map(|r| {
                r.requirers.iter().map(|(name, optional)| DemandSource {
                    name: name.clone(),
                    version_range: r.range.clone(),
                    optional: *optional,
                })
            })
            .collect()
    }

    /// Every range string in the order it was first demanded, one entry
    /// per demand.
    pub fn ranges(&self) -> Vec<String> {
        self.sources().into_iter().map(|s| s.version_range).collect()
    }

    /// Distinct requiring package names in first-seen order.
    pub fn requirers(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for source in self.sources() {
            if !names.contains(&source.name) {
                names.push(source.name);
            }
        }
        names
    }

    /// Whether at least one demand is not optional.
    pub fn has_required(&self) -> bool {
        self.by_range
            .iter()
            .any(|r| r.requirers.iter().any(|(_, optional)| !optional))
    }
}

/// Demands for every peer dependency, keyed by dependency name.
#[derive(Debug, Clone, Default)]
pub struct DemandTable {
    dependencies: BTreeMap<String, DependencyDemands>,
}

impl DemandTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one demand.
    pub fn record(&mut self, demand: &PeerDemand) {
        self.dependencies
            .entry(demand.dependency.clone())
            .or_default()
            .record(&demand.version_range, &demand.required_by, demand.optional);
    }

    /// Record every peer dependency declared by `manifest`.
    ///
    /// `fallback_name` identifies the requirer when the manifest has no name.
    pub fn record_manifest(&mut self, manifest: &Manifest, fallback_name: &str) {
        let required_by = manifest.name.as_deref().unwrap_or(fallback_name);
        for (dependency, range) in &manifest.peer_dependencies {
            self.record(&PeerDemand {
                dependency: dependency.clone(),
                version_range: range.clone(),
                optional: manifest.is_optional_peer(dependency),
                required_by: required_by.to_string(),
            });
        }
    }

    /// Iterate dependencies in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DependencyDemands)> {
        self.dependencies.iter()
    }

    /// Demands for one dependency.
    pub fn get(&self, dependency: &str) -> Option<&DependencyDemands> {
        self.dependencies.get(dependency)
    }

    /// Number of distinct demanded dependencies.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Check if nothing was demanded.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Build the demand table for every package path, in path order.
///
/// Paths without a manifest contribute nothing.
pub fn aggregate_demands(package_paths: &[PathBuf]) -> Result<DemandTable> {
    let mut table = DemandTable::new();
    for path in package_paths {
        if let Some(manifest) = read_manifest(path)? {
            table.record_manifest(&manifest, &path.display().to_string());
        }
    }
    tracing::debug!("Aggregated demands for {} peer dependencies", table.len());
    Ok(table)
}
