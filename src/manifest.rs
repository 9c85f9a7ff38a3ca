//! Project manifest (`package.json`) loading.
//!
//! A missing manifest is a valid "no manifest" state and is reported as
//! `Ok(None)`; callers decide whether that is fatal.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PeerDepError, Result};

/// File name of a project manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of a `package.json` this tool consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Declared package name.
    #[serde(default)]
    pub name: Option<String>,

    /// Declared package version.
    #[serde(default)]
    pub version: Option<String>,

    /// Runtime dependencies.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Peer dependencies the consumer must provide.
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,

    /// Optionality metadata for peer dependencies.
    #[serde(default)]
    pub peer_dependencies_meta: BTreeMap<String, PeerDependencyMeta>,

    /// Workspace member patterns.
    #[serde(default)]
    pub workspaces: Option<Workspaces>,
}

/// Metadata attached to a single peer dependency.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeerDependencyMeta {
    #[serde(default)]
    pub optional: bool,
}

/// The two accepted shapes of the `workspaces` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    /// `"workspaces": ["packages/*"]`
    Patterns(Vec<String>),
    /// `"workspaces": { "packages": ["packages/*"] }`
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    /// The declared member patterns, whichever shape was used.
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(patterns) => patterns,
            Self::Object { packages } => packages,
        }
    }
}

impl Manifest {
    /// Whether the peer dependency `name` is flagged optional.
    pub fn is_optional_peer(&self, name: &str) -> bool {
        self.peer_dependencies_meta
            .get(name)
            .is_some_and(|meta| meta.optional)
    }
}

/// Path of the manifest inside `dir`.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

/// Read and parse the manifest in `dir`.
///
/// # Errors
///
/// Returns `ManifestParse` if the file exists but is not a valid manifest,
/// and `Io` for read failures other than absence.
pub fn read_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = manifest_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PeerDepError::Io(e)),
    };

    parse_manifest(&content, &path).map(Some)
}

/// Parse manifest JSON.
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<Manifest> {
    serde_json::from_str(content).map_err(|e| PeerDepError::ManifestParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read the root manifest, treating absence as fatal.
pub fn read_root_manifest(root: &Path) -> Result<Manifest> {
    read_manifest(root)?.ok_or_else(|| PeerDepError::ManifestNotFound {
        path: manifest_path(root),
    })
}

/// Set `dependencies[name] = version` for every entry, preserving every
/// other field and the existing key order.
///
/// Returns `false` without writing when `dir` has no manifest.
pub fn write_dependencies(dir: &Path, updates: &BTreeMap<String, String>) -> Result<bool> {
    let path = manifest_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(PeerDepError::Io(e)),
    };

    let mut document: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| PeerDepError::ManifestParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

    let Some(root) = document.as_object_mut() else {
        return Err(PeerDepError::ManifestParse {
            path,
            message: "manifest is not a JSON object".to_string(),
        });
    };

    let dependencies = root
        .entry("dependencies")
        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    if !dependencies.is_object() {
        *dependencies = serde_json::Value::Object(serde_json::Map::new());
    }
    if let Some(map) = dependencies.as_object_mut() {
        for (name, version) in updates {
            map.insert(name.clone(), serde_json::Value::String(version.clone()));
        }
    }

    let json = serde_json::to_string_pretty(&document).map_err(anyhow::Error::from)?;
    fs::write(&path, json)?;
    Ok(true)
}
