//! Cache storage implementation.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::entry::{CacheEntry, Fingerprint};
use super::{CACHE_FILE, FINGERPRINT_FILES};
use crate::error::{PeerDepError, Result};
use crate::issue::Issue;

/// Reads and writes the audit cache of one project.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Project root holding the cache file.
    root: PathBuf,
}

impl CacheStore {
    /// Create a store for the project at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the cache file.
    pub fn path(&self) -> PathBuf {
        self.root.join(CACHE_FILE)
    }

    /// Hash the current content of every fingerprinted file.
    ///
    /// Absent files map to `None` so that deleting one changes the
    /// fingerprint. A file that exists but cannot be read is treated the
    /// same way, with a warning.
    pub fn fingerprint(&self) -> Fingerprint {
        FINGERPRINT_FILES
            .iter()
            .map(|name| {
                let digest = match fs::read(self.root.join(name)) {
                    Ok(content) => Some(hex::encode(Sha256::digest(&content))),
                    Err(e) if e.kind() == ErrorKind::NotFound => None,
                    Err(e) => {
                        tracing::warn!("Could not hash {}: {}", name, e);
                        None
                    }
                };
                (name.to_string(), digest)
            })
            .collect()
    }

    /// Load cached issues if the fingerprint still matches.
    ///
    /// # Errors
    ///
    /// A missing cache file, or valid JSON in an unknown shape, is a clean
    /// miss. Malformed JSON returns `CacheCorrupt`; any other read failure
    /// returns `CacheIo`.
    pub fn read(&self) -> Result<Option<Vec<Issue>>> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No cache at {:?}", path);
                return Ok(None);
            }
            Err(source) => return Err(PeerDepError::CacheIo { path, source }),
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) if e.is_data() => {
                tracing::debug!("Cache has an unexpected shape, ignoring it: {}", e);
                return Ok(None);
            }
            Err(e) => {
                return Err(PeerDepError::CacheCorrupt {
                    path,
                    message: e.to_string(),
                })
            }
        };

        if !entry.matches(&self.fingerprint()) {
            tracing::debug!("Cache invalidated: project files changed");
            return Ok(None);
        }

        tracing::debug!("Using {} cached issues", entry.issues.len());
        Ok(Some(entry.issues))
    }

    /// Persist `issues` with a freshly computed fingerprint.
    ///
    /// If the cache directory is missing it is created and the write is
    /// retried once.
    pub fn write(&self, issues: &[Issue]) -> Result<()> {
        let path = self.path();
        let entry = CacheEntry::new(self.fingerprint(), issues.to_vec());
        let json = serde_json::to_string_pretty(&entry).map_err(anyhow::Error::from)?;

        match fs::write(&path, &json) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&self.root).map_err(|source| PeerDepError::CacheIo {
                    path: self.root.clone(),
                    source,
                })?;
                fs::write(&path, &json).map_err(|source| PeerDepError::CacheIo { path, source })
            }
            Err(source) => Err(PeerDepError::CacheIo { path, source }),
        }
    }

    /// Delete the cache file. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PeerDepError::CacheIo { path, source }),
        }
    }
}
