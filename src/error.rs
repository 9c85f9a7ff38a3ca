//! Error types for peer-dep-helper operations.
//!
//! This module defines [`PeerDepError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal problems (missing root manifest, corrupt cache, failed install)
//!   get a dedicated variant so callers can tell them apart
//! - Recoverable discovery gaps never become errors; they simply
//!   contribute nothing to the pipeline
//! - Use `anyhow::Error` (via `PeerDepError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for peer-dep-helper operations.
#[derive(Debug, Error)]
pub enum PeerDepError {
    /// The project root has no `package.json`.
    #[error("No package.json found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// A `package.json` could not be parsed.
    #[error("Failed to read or parse {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Listing an install directory failed for a reason other than absence.
    #[error("Failed to scan {path}: {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted cache file exists but is not valid JSON.
    #[error("Invalid JSON in cache {path}: {message}")]
    CacheCorrupt { path: PathBuf, message: String },

    /// Reading or writing the cache file failed.
    #[error("Cache I/O failed for {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Invalid configuration value from a file, the environment, or a flag.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// Issues were handed to an operation restricted to an allow-list that
    /// does not contain all of them.
    #[error("{context}: issues list contains packages not in the allow-list: {}", .packages.join(", "))]
    AllowListViolation {
        context: String,
        packages: Vec<String>,
    },

    /// The package manager exited unsuccessfully.
    #[error("Failed to install dependencies with `{command}` (exit code {code:?}): {stderr}")]
    InstallFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The package manager binary could not be started.
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for peer-dep-helper operations.
pub type Result<T> = std::result::Result<T, PeerDepError>;
