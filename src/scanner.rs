//! Installed-package scanning.
//!
//! Walks a `node_modules` directory one level deep (two for `@scope`
//! namespaces) and records the version each package's own manifest
//! declares.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PeerDepError, Result};
use crate::manifest::manifest_path;

/// Name of the dependency-install directory.
pub const INSTALL_DIR: &str = "node_modules";

/// Package name → installed version.
pub type InstalledPackages = BTreeMap<String, String>;

/// Only the identity fields of an installed package's manifest.
#[derive(Debug, Deserialize)]
struct InstalledManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Scan the install directory of `package_dir`.
///
/// A missing install directory yields an empty map. Packages without a
/// manifest, or whose manifest declares no version, are skipped.
///
/// # Errors
///
/// Any other failure to list a directory or read a manifest propagates.
pub fn scan_installed(package_dir: &Path) -> Result<InstalledPackages> {
    let install_dir = package_dir.join(INSTALL_DIR);
    let mut installed = InstalledPackages::new();

    let candidates = match list_dirs(&install_dir) {
        Ok(dirs) => dirs,
        Err(PeerDepError::ScanFailed { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::debug!("No {} in {:?}", INSTALL_DIR, package_dir);
            return Ok(installed);
        }
        Err(e) => return Err(e),
    };

    for (dir_name, path) in candidates {
        if dir_name.starts_with('@') {
            for (scoped_name, scoped_path) in list_dirs(&path)? {
                record(&mut installed, &format!("{}/{}", dir_name, scoped_name), &scoped_path)?;
            }
        } else {
            record(&mut installed, &dir_name, &path)?;
        }
    }

    Ok(installed)
}

/// Scan every path and merge the results; later paths win on conflicts.
pub fn scan_all(package_dirs: &[PathBuf]) -> Result<InstalledPackages> {
    let mut merged = InstalledPackages::new();
    for dir in package_dirs {
        merged.extend(scan_installed(dir)?);
    }
    Ok(merged)
}

fn record(installed: &mut InstalledPackages, dir_name: &str, path: &Path) -> Result<()> {
    let manifest_file = manifest_path(path);
    let content = match fs::read_to_string(&manifest_file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(PeerDepError::ScanFailed {
                path: manifest_file,
                source: e,
            })
        }
    };

    let manifest: InstalledManifest =
        serde_json::from_str(&content).map_err(|e| PeerDepError::ManifestParse {
            path: manifest_file.clone(),
            message: e.to_string(),
        })?;

    if let Some(version) = manifest.version {
        let name = manifest.name.unwrap_or_else(|| dir_name.to_string());
        installed.insert(name, version);
    }
    Ok(())
}

/// Non-hidden subdirectories of `dir` as `(file name, path)` pairs.
fn list_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let scan_failed = |source| PeerDepError::ScanFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_failed)? {
        let entry = entry.map_err(scan_failed)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        // Follows symlinks so linked workspace packages count as installed.
        if entry.path().is_dir() {
            dirs.push((name, entry.path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}
