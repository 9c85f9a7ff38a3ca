//! Resolved settings and the layers they are built from.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{PeerDepError, Result};
use crate::registry::DEFAULT_REGISTRY_URL;
use crate::resolver::Strategy;

/// One source of configuration: a file, the environment, or the command line.
///
/// Every field is optional; `None` means "not set here". Keys in config
/// files are camelCase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigLayer {
    pub cwd: Option<PathBuf>,
    /// Kept as text so an unknown name is reported as a validation error.
    pub strategy: Option<String>,
    pub dry_run: Option<bool>,
    pub fail_on_issues: Option<bool>,
    pub ignore: Option<Vec<String>>,
    pub only: Option<Vec<String>>,
    pub write: Option<bool>,
    pub json: Option<bool>,
    pub silent: Option<bool>,
    pub cache: Option<bool>,
    pub offline: Option<bool>,
    pub registry: Option<String>,
}

impl ConfigLayer {
    /// Overlay `other` on top of `self`. Set fields in `other` win; lists
    /// are replaced, not merged.
    pub fn merge(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            cwd: other.cwd.or(self.cwd),
            strategy: other.strategy.or(self.strategy),
            dry_run: other.dry_run.or(self.dry_run),
            fail_on_issues: other.fail_on_issues.or(self.fail_on_issues),
            ignore: other.ignore.or(self.ignore),
            only: other.only.or(self.only),
            write: other.write.or(self.write),
            json: other.json.or(self.json),
            silent: other.silent.or(self.silent),
            cache: other.cache.or(self.cache),
            offline: other.offline.or(self.offline),
            registry: other.registry.or(self.registry),
        }
    }

    /// Check whether nothing is set.
    pub fn is_empty(&self) -> bool {
        *self == ConfigLayer::default()
    }
}

/// Fully resolved options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cwd: PathBuf,
    pub strategy: Strategy,
    pub dry_run: bool,
    pub fail_on_issues: bool,
    pub ignore: Vec<String>,
    pub only: Vec<String>,
    pub write: bool,
    pub json: bool,
    pub silent: bool,
    pub cache: bool,
    pub offline: bool,
    pub registry: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            strategy: Strategy::default(),
            dry_run: false,
            fail_on_issues: false,
            ignore: Vec::new(),
            only: Vec::new(),
            write: false,
            json: false,
            silent: false,
            cache: true,
            offline: false,
            registry: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}

impl Settings {
    /// Resolve layers given lowest priority first on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` for an unknown strategy or an empty
    /// registry URL.
    pub fn resolve(layers: impl IntoIterator<Item = ConfigLayer>) -> Result<Self> {
        let merged = layers
            .into_iter()
            .fold(ConfigLayer::default(), ConfigLayer::merge);
        Self::from_layer(merged)
    }

    fn from_layer(layer: ConfigLayer) -> Result<Self> {
        let defaults = Settings::default();

        let strategy = match layer.strategy {
            Some(name) => name
                .parse::<Strategy>()
                .map_err(|message| PeerDepError::ConfigValidation { message })?,
            None => defaults.strategy,
        };

        let registry = match layer.registry {
            Some(url) if url.trim().is_empty() => {
                return Err(PeerDepError::ConfigValidation {
                    message: "registry URL must not be empty".to_string(),
                })
            }
            Some(url) => url.trim().to_string(),
            None => defaults.registry,
        };

        Ok(Self {
            cwd: layer.cwd.unwrap_or(defaults.cwd),
            strategy,
            dry_run: layer.dry_run.unwrap_or(defaults.dry_run),
            fail_on_issues: layer.fail_on_issues.unwrap_or(defaults.fail_on_issues),
            ignore: layer.ignore.unwrap_or_default(),
            only: layer.only.unwrap_or_default(),
            write: layer.write.unwrap_or(defaults.write),
            json: layer.json.unwrap_or(defaults.json),
            silent: layer.silent.unwrap_or(defaults.silent),
            cache: layer.cache.unwrap_or(defaults.cache),
            offline: layer.offline.unwrap_or(defaults.offline),
            registry,
        })
    }
}
