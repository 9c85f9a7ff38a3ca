//! Audit result caching.
//!
//! A single cache file in the project root stores the last classification
//! together with a content fingerprint of the manifest and lockfiles. The
//! entry is trusted only while every fingerprinted file is byte-for-byte
//! unchanged; it is never updated in place.

pub mod entry;
pub mod store;

pub use entry::{CacheEntry, Fingerprint};
pub use store::CacheStore;

/// File name of the cache in the project root.
pub const CACHE_FILE: &str = ".peer-dep-helper-cache.json";

/// Files whose content keys the cache, in fingerprint order.
pub const FINGERPRINT_FILES: [&str; 4] = [
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
];
