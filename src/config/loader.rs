//! Configuration discovery and loading.
//!
//! Layers are combined in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. The nearest config file, found by walking up from the working directory
//! 3. `PEER_DEP_HELPER_*` environment variables
//! 4. Command-line flags

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::settings::{ConfigLayer, Settings};
use crate::error::{PeerDepError, Result};
use crate::manifest::MANIFEST_FILE;

/// Dedicated config file names, checked in order within each directory.
pub const CONFIG_FILES: [&str; 5] = [
    ".peer-dep-helperrc",
    ".peer-dep-helperrc.json",
    ".peer-dep-helperrc.yaml",
    ".peer-dep-helperrc.yml",
    "peer-dep-helper.config.json",
];

/// Key holding embedded configuration inside `package.json`.
pub const PACKAGE_JSON_KEY: &str = "peer-dep-helper";

/// Prefix shared by every recognised environment variable.
pub const ENV_PREFIX: &str = "PEER_DEP_HELPER_";

/// Where the file layer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A dedicated config file.
    File(PathBuf),
    /// The `"peer-dep-helper"` key of a `package.json`.
    PackageJson(PathBuf),
}

impl ConfigSource {
    /// Path of the file holding the configuration.
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::PackageJson(path) => path,
        }
    }
}

/// Load settings for an invocation whose command line produced `flags`.
///
/// File discovery starts at `flags.cwd`, or the current directory.
///
/// # Errors
///
/// Returns `ConfigValidation` for bad values from any layer. A config file
/// that cannot be read or parsed is logged and skipped.
pub fn load_settings(flags: ConfigLayer) -> Result<Settings> {
    load_settings_with(flags, |key| std::env::var(key).ok())
}

/// Like [`load_settings`], reading environment variables through `lookup`.
pub fn load_settings_with<F>(flags: ConfigLayer, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let start = match &flags.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir()?,
    };

    let file = match load_file_layer(&start)? {
        Some((source, layer)) => {
            tracing::debug!("Loaded config from {}", source.path().display());
            layer
        }
        None => ConfigLayer::default(),
    };
    let env = env_layer(lookup)?;

    let mut settings = Settings::resolve([file, env, flags])?;
    if settings.cwd.is_relative() {
        settings.cwd = start.join(&settings.cwd);
    }
    Ok(settings)
}

/// Find the nearest configuration, walking up from `start`.
///
/// Within one directory the dedicated files win over `package.json`.
pub fn find_config(start: &Path) -> Result<Option<ConfigSource>> {
    for dir in start.ancestors() {
        if let Some(name) = CONFIG_FILES.iter().find(|name| dir.join(name).is_file()) {
            return Ok(Some(ConfigSource::File(dir.join(name))));
        }

        let manifest = dir.join(MANIFEST_FILE);
        if manifest.is_file() && package_json_section(&manifest)?.is_some() {
            return Ok(Some(ConfigSource::PackageJson(manifest)));
        }
    }
    Ok(None)
}

/// Load the file layer for `start`, if any configuration is found.
pub fn load_file_layer(start: &Path) -> Result<Option<(ConfigSource, ConfigLayer)>> {
    let Some(source) = find_config(start)? else {
        return Ok(None);
    };

    let loaded = match &source {
        ConfigSource::File(path) => read(path).and_then(|content| parse_config(&content, path)),
        ConfigSource::PackageJson(path) => match package_json_section(path) {
            Ok(Some(value)) => from_value(value, path),
            Ok(None) => Ok(ConfigLayer::default()),
            Err(e) => Err(e),
        },
    };

    // A broken config file never stops the run; its layer is empty.
    let layer = loaded.unwrap_or_else(|e| {
        tracing::warn!("Could not load {}: {}", source.path().display(), e);
        ConfigLayer::default()
    });

    Ok(Some((source, layer)))
}

/// Parse a config document. JSON documents are accepted as YAML.
///
/// An empty document is an empty layer.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ConfigLayer> {
    if content.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| PeerDepError::ConfigParse {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    from_value(value, source_path)
}

fn from_value(value: serde_yaml::Value, source_path: &Path) -> Result<ConfigLayer> {
    if value.is_null() {
        return Ok(ConfigLayer::default());
    }
    serde_yaml::from_value(value).map_err(|e| PeerDepError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| PeerDepError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn package_json_section(path: &Path) -> Result<Option<serde_yaml::Value>> {
    let content = read(path)?;
    let Ok(serde_yaml::Value::Mapping(mut map)) = serde_yaml::from_str::<serde_yaml::Value>(&content)
    else {
        // A broken package.json is reported by the manifest reader.
        return Ok(None);
    };
    Ok(map.remove(PACKAGE_JSON_KEY))
}

/// Build the environment layer from variables resolved by `lookup`.
///
/// # Errors
///
/// Returns `ConfigValidation` for a boolean variable that is not one of
/// `1/0/true/false/yes/no`.
pub fn env_layer<F>(lookup: F) -> Result<ConfigLayer>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| {
        lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|value| !value.trim().is_empty())
    };
    let flag = |name: &str| -> Result<Option<bool>> {
        var(name)
            .map(|value| parse_bool(&format!("{}{}", ENV_PREFIX, name), &value))
            .transpose()
    };

    Ok(ConfigLayer {
        cwd: None,
        strategy: var("STRATEGY").map(|s| s.trim().to_string()),
        dry_run: flag("DRY_RUN")?,
        fail_on_issues: flag("FAIL_ON_ISSUES")?,
        ignore: var("IGNORE").map(|s| split_list(&s)),
        only: var("ONLY").map(|s| split_list(&s)),
        write: flag("WRITE")?,
        json: flag("JSON")?,
        silent: flag("SILENT")?,
        cache: flag("NO_CACHE")?.map(|no_cache| !no_cache),
        offline: flag("OFFLINE")?,
        registry: var("REGISTRY"),
    })
}

/// Parse a boolean setting named `name`.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(PeerDepError::ConfigValidation {
            message: format!("{} must be a boolean, got '{}'", name, other),
        }),
    }
}

/// Split a comma-separated package list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Strategy;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn flags_at(cwd: &Path) -> ConfigLayer {
        ConfigLayer {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn no_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings_with(flags_at(temp.path()), no_env).unwrap();
        assert_eq!(settings.strategy, Strategy::Compatible);
        assert_eq!(settings.cwd, temp.path());
        assert!(settings.cache);
    }

    #[test]
    fn rc_file_is_found_walking_up() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".peer-dep-helperrc"),
            "strategy: strict\nignore:\n  - eslint\n",
        )
        .unwrap();
        let nested = temp.path().join("packages/ui");
        fs::create_dir_all(&nested).unwrap();

        let settings = load_settings_with(flags_at(&nested), no_env).unwrap();
        assert_eq!(settings.strategy, Strategy::Strict);
        assert_eq!(settings.ignore, vec!["eslint"]);
    }

    #[test]
    fn json_config_file_is_accepted() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("peer-dep-helper.config.json"),
            r#"{"failOnIssues": true, "only": ["react"]}"#,
        )
        .unwrap();

        let settings = load_settings_with(flags_at(temp.path()), no_env).unwrap();
        assert!(settings.fail_on_issues);
        assert_eq!(settings.only, vec!["react"]);
    }

    #[test]
    fn package_json_key_is_used_without_rc_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"app","peer-dep-helper":{"dryRun":true}}"#,
        )
        .unwrap();

        let source = find_config(temp.path()).unwrap().unwrap();
        assert!(matches!(source, ConfigSource::PackageJson(_)));
        assert!(load_settings_with(flags_at(temp.path()), no_env).unwrap().dry_run);
    }

    #[test]
    fn rc_file_beats_package_json_in_same_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"app","peer-dep-helper":{"strategy":"latest"}}"#,
        )
        .unwrap();
        fs::write(temp.path().join(".peer-dep-helperrc.yml"), "strategy: strict").unwrap();

        let settings = load_settings_with(flags_at(temp.path()), no_env).unwrap();
        assert_eq!(settings.strategy, Strategy::Strict);
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".peer-dep-helperrc"), "strategy: strict\nwrite: true").unwrap();

        let vars = env(&[
            ("PEER_DEP_HELPER_STRATEGY", "latest"),
            ("PEER_DEP_HELPER_WRITE", "no"),
            ("PEER_DEP_HELPER_IGNORE", "a, b,,"),
        ]);
        let settings = load_settings_with(flags_at(temp.path()), &vars).unwrap();
        assert_eq!(settings.strategy, Strategy::Latest);
        assert!(!settings.write);
        assert_eq!(settings.ignore, vec!["a", "b"]);

        let flags = ConfigLayer {
            strategy: Some("compatible".into()),
            ..flags_at(temp.path())
        };
        let settings = load_settings_with(flags, &vars).unwrap();
        assert_eq!(settings.strategy, Strategy::Compatible);
    }

    #[test]
    fn no_cache_env_disables_cache() {
        let layer = env_layer(env(&[("PEER_DEP_HELPER_NO_CACHE", "1")])).unwrap();
        assert_eq!(layer.cache, Some(false));
    }

    #[test]
    fn invalid_boolean_env_is_rejected() {
        let err = env_layer(env(&[("PEER_DEP_HELPER_DRY_RUN", "maybe")])).unwrap_err();
        assert!(matches!(err, PeerDepError::ConfigValidation { .. }));
        assert!(err.to_string().contains("PEER_DEP_HELPER_DRY_RUN"));
    }

    #[test]
    fn unknown_strategy_in_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".peer-dep-helperrc"), "strategy: newest").unwrap();
        let err = load_settings_with(flags_at(temp.path()), no_env).unwrap_err();
        assert!(matches!(err, PeerDepError::ConfigValidation { .. }));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".peer-dep-helperrc"), "strategy: [unclosed").unwrap();
        let settings = load_settings_with(flags_at(temp.path()), no_env).unwrap();
        assert_eq!(settings.strategy, Settings::default().strategy);
        assert!(!settings.fail_on_issues);
    }

    #[test]
    fn malformed_package_json_section_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"app","peer-dep-helper":{"failOnIssues":"sometimes"}}"#,
        )
        .unwrap();
        let (source, layer) = load_file_layer(temp.path()).unwrap().unwrap();
        assert!(matches!(source, ConfigSource::PackageJson(_)));
        assert!(layer.is_empty());
    }

    #[test]
    fn empty_file_is_empty_layer() {
        let layer = parse_config("  \n", Path::new(".peer-dep-helperrc")).unwrap();
        assert!(layer.is_empty());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for value in ["1", "true", "YES"] {
            assert!(parse_bool("X", value).unwrap());
        }
        for value in ["0", "False", "no"] {
            assert!(!parse_bool("X", value).unwrap());
        }
    }
}
