//! Configuration loading and validation.
//!
//! - Layer and settings types in [`settings`]
//! - File discovery, environment parsing and precedence in [`loader`]
//!
//! # Example
//!
//! ```
//! use peer_dep_helper::config::{load_settings_with, ConfigLayer};
//! use peer_dep_helper::resolver::Strategy;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".peer-dep-helperrc"), "strategy: strict").unwrap();
//!
//! let flags = ConfigLayer {
//!     cwd: Some(temp.path().to_path_buf()),
//!     ..Default::default()
//! };
//! let settings = load_settings_with(flags, |_| None).unwrap();
//! assert_eq!(settings.strategy, Strategy::Strict);
//! ```

pub mod loader;
pub mod settings;

pub use loader::{
    env_layer, find_config, load_file_layer, load_settings, load_settings_with, parse_bool,
    parse_config, split_list, ConfigSource, CONFIG_FILES, ENV_PREFIX, PACKAGE_JSON_KEY,
};
pub use settings::{ConfigLayer, Settings};
