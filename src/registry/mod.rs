//! Package registry lookups.
//!
//! The registry answers two best-effort questions: the latest published
//! version of a package and the full list of published versions. Every
//! failure degrades to `None`; a lookup never aborts a run.

mod npm;

pub use npm::{NpmRegistry, DEFAULT_REGISTRY_URL};

use crate::range::VersionRange;

/// Source of published-version information.
pub trait Registry {
    /// The version tagged `latest`, if known.
    fn latest_version(&self, package: &str) -> Option<String>;

    /// Every published version, if known.
    fn published_versions(&self, package: &str) -> Option<Vec<String>>;
}

/// A registry that never knows anything. Used with `--offline`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRegistry;

impl Registry for OfflineRegistry {
    fn latest_version(&self, _package: &str) -> Option<String> {
        None
    }

    fn published_versions(&self, _package: &str) -> Option<Vec<String>> {
        None
    }
}

impl<R: Registry + ?Sized> Registry for &R {
    fn latest_version(&self, package: &str) -> Option<String> {
        (**self).latest_version(package)
    }

    fn published_versions(&self, package: &str) -> Option<Vec<String>> {
        (**self).published_versions(package)
    }
}

/// Pick the version to install for `package` given its required range.
///
/// Without a known latest version or any published versions nothing can be
/// chosen. An empty or `*` range takes the latest version; otherwise the
/// highest published version inside the range wins, falling back to latest
/// when none matches.
pub fn resolve_install_version(
    registry: &dyn Registry,
    package: &str,
    range: Option<&str>,
) -> Option<String> {
    let latest = registry.latest_version(package)?;
    let published = registry.published_versions(package)?;
    if published.is_empty() {
        return None;
    }

    let range = range.map(str::trim).unwrap_or_default();
    if range.is_empty() || range == "*" {
        return Some(latest);
    }

    let best = VersionRange::parse(range)
        .ok()
        .and_then(|parsed| parsed.max_satisfying(&published).map(String::from));

    match best {
        Some(version) => Some(version),
        None => {
            tracing::debug!(
                "No published version of {} satisfies '{}'; using latest {}",
                package,
                range,
                latest
            );
            Some(latest)
        }
    }
}
