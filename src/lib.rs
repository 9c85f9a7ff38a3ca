//! peer-dep-helper - Detect, audit, and fix peer dependency issues.
//!
//! The library audits a JavaScript project's peer-dependency declarations
//! against what is installed in `node_modules`, classifies every demanded
//! peer dependency, and can drive the package manager until the problems
//! are resolved.
//!
//! # Modules
//!
//! - [`manifest`] - `package.json` reading and write-back
//! - [`workspace`] - Workspace member discovery
//! - [`scanner`] - Installed-package scanning
//! - [`demand`] - Peer-dependency demand aggregation
//! - [`range`] - npm version ranges
//! - [`resolver`] - Range resolution strategies
//! - [`registry`] - Published-version lookups
//! - [`issue`] - Issue classification and allow/ignore lists
//! - [`cache`] - Fingerprinted result cache
//! - [`audit`] - The detection pipeline
//! - [`fix`] - The fix-and-reverify loop
//! - [`installer`] / [`package_manager`] - Package installation
//! - [`config`] - Layered configuration
//! - [`cli`] - Command-line interface
//! - [`ui`] - Terminal output and report rendering
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use peer_dep_helper::audit::{AuditOptions, Auditor};
//! use peer_dep_helper::issue::IssueStatus;
//! use peer_dep_helper::registry::OfflineRegistry;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("package.json"),
//!     r#"{"name":"app","peerDependencies":{"react":"^18.0.0"}}"#,
//! )
//! .unwrap();
//!
//! let issues = Auditor::new(temp.path(), &OfflineRegistry, AuditOptions::default())
//!     .run()
//!     .unwrap();
//! assert_eq!(issues[0].package, "react");
//! assert_eq!(issues[0].status, IssueStatus::Missing);
//! ```

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod demand;
pub mod error;
pub mod fix;
pub mod installer;
pub mod issue;
pub mod manifest;
pub mod package_manager;
pub mod range;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod ui;
pub mod workspace;

pub use error::{PeerDepError, Result};
