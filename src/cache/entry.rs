//! Cache entry type.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::issue::Issue;

/// File name → hex digest of its content, or `None` when the file is absent.
pub type Fingerprint = BTreeMap<String, Option<String>>;

/// A persisted audit result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Milliseconds since the Unix epoch when the entry was written.
    pub timestamp: i64,
    /// Fingerprint of the project files at write time.
    pub file_hashes: Fingerprint,
    /// Issues before any ignore filtering.
    pub issues: Vec<Issue>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(file_hashes: Fingerprint, issues: Vec<Issue>) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            file_hashes,
            issues,
        }
    }

    /// Whether this entry was written for exactly `current`.
    pub fn matches(&self, current: &Fingerprint) -> bool {
        &self.file_hashes == current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(manifest: Option<&str>) -> Fingerprint {
        let mut hashes = Fingerprint::new();
        hashes.insert("package.json".into(), manifest.map(String::from));
        hashes.insert("yarn.lock".into(), None);
        hashes
    }

    #[test]
    fn entry_is_timestamped() {
        let entry = CacheEntry::new(fingerprint(Some("abc")), Vec::new());
        assert!(entry.timestamp > 0);
    }

    #[test]
    fn matches_requires_identical_fingerprint() {
        let entry = CacheEntry::new(fingerprint(Some("abc")), Vec::new());
        assert!(entry.matches(&fingerprint(Some("abc"))));
        assert!(!entry.matches(&fingerprint(Some("def"))));
        assert!(!entry.matches(&fingerprint(None)));
    }

    #[test]
    fn serializes_with_camel_case_and_null_hashes() {
        let entry = CacheEntry::new(fingerprint(None), Vec::new());
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["fileHashes"]["package.json"].is_null());
        assert!(value["issues"].as_array().unwrap().is_empty());
    }
}
