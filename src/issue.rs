//! Issue classification.
//!
//! Every demanded peer dependency becomes at most one [`Issue`]. The
//! decision order is fixed: missing, then outdated, then version mismatch,
//! then valid. A dependency that is absent and only demanded optionally
//! produces no issue at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::demand::{DemandSource, DemandTable, DependencyDemands};
use crate::error::{PeerDepError, Result};
use crate::range::{parse_version, VersionRange};
use crate::registry::Registry;
use crate::resolver::{resolve_range, Strategy};
use crate::scanner::InstalledPackages;

/// Classification of one peer dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Not installed and required by at least one package.
    Missing,
    /// Installed, but older than the latest published version.
    Outdated,
    /// Installed at a version outside at least one demanded range.
    VersionMismatch,
    /// Installed and acceptable to every demand.
    Valid,
}

impl IssueStatus {
    /// Statuses the fix loop acts on.
    pub fn is_fixable(&self) -> bool {
        matches!(self, Self::Missing | Self::VersionMismatch)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Outdated => "outdated",
            Self::VersionMismatch => "version_mismatch",
            Self::Valid => "valid",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification result for one peer dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub package: String,
    /// Comma-joined names of every requiring package.
    pub required_by: String,
    /// Representative range, or the latest version for `outdated`.
    pub required_version: Option<String>,
    pub installed_version: Option<String>,
    pub status: IssueStatus,
    #[serde(default)]
    pub demanded_by: Vec<DemandSource>,
    #[serde(default)]
    pub latest_version: Option<String>,
}

impl Issue {
    /// Whether the fix loop should act on this issue.
    pub fn is_fixable(&self) -> bool {
        self.status.is_fixable()
    }
}

/// Classify a single dependency.
///
/// `installed` and `latest` are the installed and latest published
/// versions, when known.
pub fn classify_dependency(
    package: &str,
    demands: &DependencyDemands,
    installed: Option<&str>,
    latest: Option<&str>,
    strategy: Strategy,
) -> Option<Issue> {
    let installed = installed.filter(|v| !v.is_empty());
    let required_version = resolve_range(&demands.ranges(), strategy);

    let status = match installed {
        None if demands.has_required() => IssueStatus::Missing,
        None => {
            tracing::debug!("Skipping {}: only optional demands and not installed", package);
            return None;
        }
        Some(version) if is_outdated(version, latest) => IssueStatus::Outdated,
        Some(version) if !satisfies_all(version, demands) => IssueStatus::VersionMismatch,
        Some(_) => IssueStatus::Valid,
    };

    let required_version = match status {
        IssueStatus::Outdated => latest.map(String::from),
        _ => required_version,
    };

    Some(Issue {
        package: package.to_string(),
        required_by: demands.requirers().join(", "),
        required_version,
        installed_version: installed.map(String::from),
        status,
        demanded_by: demands.sources(),
        latest_version: latest.map(String::from),
    })
}

/// Classify every demanded dependency in name order.
pub fn classify_all(
    demands: &DemandTable,
    installed: &InstalledPackages,
    registry: &dyn Registry,
    strategy: Strategy,
) -> Vec<Issue> {
    demands
        .iter()
        .filter_map(|(package, dependency_demands)| {
            let latest = registry.latest_version(package);
            classify_dependency(
                package,
                dependency_demands,
                installed.get(package).map(String::as_str),
                latest.as_deref(),
                strategy,
            )
        })
        .collect()
}

/// Whether `installed < latest` by semantic-version precedence.
///
/// Unparseable versions are never considered outdated.
fn is_outdated(installed: &str, latest: Option<&str>) -> bool {
    let (Some(installed), Some(latest)) = (parse_version(installed), latest.and_then(parse_version))
    else {
        return false;
    };
    installed < latest
}

/// Whether `installed` satisfies each individual demanded range.
fn satisfies_all(installed: &str, demands: &DependencyDemands) -> bool {
    let version = parse_version(installed);

    demands.ranges().iter().all(|range| {
        let range = range.trim();
        if range.is_empty() || range == "*" {
            return true;
        }
        match (&version, VersionRange::parse(range)) {
            (Some(version), Ok(parsed)) => parsed.satisfies(version),
            _ => false,
        }
    })
}

/// Drop issues whose package is on the ignore list.
pub fn filter_ignored(issues: Vec<Issue>, ignore: &[String]) -> Vec<Issue> {
    if ignore.is_empty() {
        return issues;
    }
    issues
        .into_iter()
        .filter(|issue| !ignore.contains(&issue.package))
        .collect()
}

/// Keep only issues for packages on the allow-list. An empty list keeps
/// everything.
pub fn restrict_to(issues: Vec<Issue>, only: &[String]) -> Vec<Issue> {
    if only.is_empty() {
        return issues;
    }
    issues
        .into_iter()
        .filter(|issue| only.contains(&issue.package))
        .collect()
}

/// Check that every issue belongs to the allow-list.
///
/// # Errors
///
/// Returns `AllowListViolation` naming the offending packages. An empty
/// allow-list accepts everything.
pub fn ensure_allowed(issues: &[Issue], only: &[String], context: &str) -> Result<()> {
    if only.is_empty() {
        return Ok(());
    }

    let outside: Vec<String> = issues
        .iter()
        .filter(|issue| !only.contains(&issue.package))
        .map(|issue| issue.package.clone())
        .collect();

    if outside.is_empty() {
        Ok(())
    } else {
        Err(PeerDepError::AllowListViolation {
            context: context.to_string(),
            packages: outside,
        })
    }
}
