//! Workspace member discovery.
//!
//! Expands the root manifest's `workspaces` patterns and the conventional
//! pnpm layout into a deduplicated list of member directories. Read
//! failures on candidate directories are swallowed: partial discovery is
//! the expected failure mode.

use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::Manifest;

/// Secondary workspace-config file whose presence implies pnpm layout.
pub const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Member directories assumed when [`PNPM_WORKSPACE_FILE`] exists.
pub const PNPM_MEMBER_DIRS: [&str; 2] = ["packages", "apps"];

/// How a single workspace pattern is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspacePattern {
    /// `dir/*`: every immediate subdirectory of `dir`.
    Glob(PathBuf),
    /// A literal member directory.
    Literal(PathBuf),
}

impl WorkspacePattern {
    /// Classify a pattern relative to `root`.
    pub fn classify(root: &Path, pattern: &str) -> Self {
        match pattern.strip_suffix("/*") {
            Some(parent) => Self::Glob(root.join(parent)),
            None => Self::Literal(root.join(pattern)),
        }
    }
}

/// Discover workspace member directories for the project at `root`.
///
/// The root itself is not included; see [`package_paths`].
pub fn discover_workspaces(root: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    let mut members = Vec::new();

    if let Some(workspaces) = &manifest.workspaces {
        for pattern in workspaces.patterns() {
            match WorkspacePattern::classify(root, pattern) {
                WorkspacePattern::Glob(parent) => members.extend(subdirectories(&parent)),
                WorkspacePattern::Literal(dir) => {
                    if dir.is_dir() {
                        members.push(dir);
                    } else {
                        tracing::debug!("Workspace pattern '{}' matched nothing", pattern);
                    }
                }
            }
        }
    }

    if root.join(PNPM_WORKSPACE_FILE).exists() {
        for dir in PNPM_MEMBER_DIRS {
            members.extend(subdirectories(&root.join(dir)));
        }
    }

    dedup_preserving_order(members)
}

/// The root followed by every workspace member, deduplicated.
pub fn package_paths(root: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    let mut paths = vec![root.to_path_buf()];
    paths.extend(discover_workspaces(root, manifest));
    dedup_preserving_order(paths)
}

/// Immediate, non-hidden subdirectories of `dir`; empty if unreadable.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping workspace directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    dirs
}

fn dedup_preserving_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
