//! npm registry client.
//!
//! Fetches the abbreviated packument (`GET <registry>/<name>`) and keeps
//! one response per package for the lifetime of the client.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::Registry;
use crate::error::Result;

/// Public npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Media type of the abbreviated install metadata document.
const ABBREVIATED_METADATA: &str = "application/vnd.npm.install-v1+json";

/// Subset of a packument this tool reads.
#[derive(Debug, Clone, Deserialize)]
struct Packument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: serde_json::Map<String, serde_json::Value>,
}

/// Looks up package metadata over HTTP.
pub struct NpmRegistry {
    client: Client,
    base_url: String,
    timeout: Duration,
    packuments: Mutex<HashMap<String, Option<Packument>>>,
}

impl NpmRegistry {
    /// Create a client for `base_url` with the default 10-second timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("peer-dep-helper/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(anyhow::Error::from)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            packuments: Mutex::new(HashMap::new()),
        })
    }

    /// The registry base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Metadata URL for `package`; the scope separator is percent-encoded.
    pub fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package.replace('/', "%2F"))
    }

    fn packument(&self, package: &str) -> Option<Packument> {
        if let Ok(memo) = self.packuments.lock() {
            if let Some(cached) = memo.get(package) {
                return cached.clone();
            }
        }

        let fetched = match self.fetch(package) {
            Ok(packument) => Some(packument),
            Err(e) => {
                tracing::debug!("Registry lookup for {} failed: {:#}", package, e);
                None
            }
        };

        if let Ok(mut memo) = self.packuments.lock() {
            memo.insert(package.to_string(), fetched.clone());
        }
        fetched
    }

    fn fetch(&self, package: &str) -> anyhow::Result<Packument> {
        let url = self.package_url(package);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, ABBREVIATED_METADATA)
            .send()?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP {} fetching {}", response.status(), url);
        }

        Ok(response.json()?)
    }
}

impl Registry for NpmRegistry {
    fn latest_version(&self, package: &str) -> Option<String> {
        self.packument(package)?.dist_tags.get("latest").cloned()
    }

    fn published_versions(&self, package: &str) -> Option<Vec<String>> {
        Some(self.packument(package)?.versions.keys().cloned().collect())
    }
}
