//! npm-style version ranges.
//!
//! Parsing and matching follow npm's rules through [`deno_semver`]. This
//! module adds the containment check used to narrow demanded ranges and
//! rejects inputs npm itself rejects: dist tags such as `latest`, and
//! numeric components above `Number.MAX_SAFE_INTEGER`.
//!
//! # Example
//!
//! ```
//! use peer_dep_helper::range::{parse_version, VersionRange};
//!
//! let range = VersionRange::parse("^1.2.0").unwrap();
//! assert!(range.satisfies(&parse_version("1.9.3").unwrap()));
//! assert!(!range.satisfies(&parse_version("2.0.0").unwrap()));
//! ```

use std::fmt;
use std::sync::LazyLock;

use deno_semver::{RangeSetOrTag, VersionRangeSet, VersionReq};
use regex::Regex;
use thiserror::Error;

pub use deno_semver::Version;

/// Largest integer npm accepts in a version component.
pub const MAX_SAFE_COMPONENT: u64 = 9_007_199_254_740_991;

static NUMERIC_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("NUMERIC_PART must compile"));

/// Error produced when a range string is not valid npm range syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version range '{range}': {reason}")]
pub struct RangeParseError {
    pub range: String,
    pub reason: String,
}

impl RangeParseError {
    fn new(range: &str, reason: impl Into<String>) -> Self {
        Self {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}

/// Find a numeric run in `text` that npm would refuse as too large.
fn oversized_component(text: &str) -> Option<&str> {
    NUMERIC_PART
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|digits| digits.parse::<u64>().map_or(true, |n| n > MAX_SAFE_COMPONENT))
}

/// Parse an installed or published version string.
///
/// Accepts a leading `v` or `=` the way npm does. Build metadata is
/// dropped since it never participates in range matching.
pub fn parse_version(text: &str) -> Option<Version> {
    let trimmed = text.trim().trim_start_matches(['v', '=']);
    if trimmed.is_empty() || oversized_component(trimmed).is_some() {
        return None;
    }
    let mut version = Version::parse_from_npm(trimmed).ok()?;
    version.build = Default::default();
    Some(version)
}

/// A parsed npm version range.
#[derive(Debug, Clone)]
pub struct VersionRange {
    raw: String,
    req: VersionReq,
}

impl VersionRange {
    /// Parse a range string.
    pub fn parse(text: &str) -> Result<Self, RangeParseError> {
        if let Some(digits) = oversized_component(text) {
            return Err(RangeParseError::new(
                text,
                format!("component {} exceeds {}", digits, MAX_SAFE_COMPONENT),
            ));
        }

        let req = VersionReq::parse_from_npm(text.trim())
            .map_err(|e| RangeParseError::new(text, e.to_string()))?;
        if let Some(tag) = req.tag() {
            return Err(RangeParseError::new(
                text,
                format!("'{}' is a dist tag, not a range", tag),
            ));
        }

        Ok(Self {
            raw: text.to_string(),
            req,
        })
    }

    /// The range text as written in the manifest.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check whether `version` falls inside this range.
    ///
    /// Prerelease versions only match a range that names a prerelease of
    /// the same `major.minor.patch`.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    /// Check whether some version could satisfy both ranges.
    pub fn intersects(&self, other: &VersionRange) -> bool {
        self.req.intersects(&other.req)
    }

    /// Check whether every version allowed by `self` is allowed by `other`.
    ///
    /// Each `||` branch of `self` must fit inside a single branch of
    /// `other`; a union on the right that only covers `self` jointly is
    /// not recognized.
    pub fn is_subset_of(&self, other: &VersionRange) -> bool {
        let (Some(inner), Some(outer)) = (self.range_set(), other.range_set()) else {
            return false;
        };
        inner
            .0
            .iter()
            .all(|branch| outer.0.iter().any(|bound| branch.clamp(bound) == *branch))
    }

    /// Pick the highest version from `versions` that satisfies this range.
    pub fn max_satisfying<'a>(&self, versions: &'a [String]) -> Option<&'a str> {
        versions
            .iter()
            .filter_map(|text| parse_version(text).map(|v| (v, text.as_str())))
            .filter(|(v, _)| self.satisfies(v))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, text)| text)
    }

    fn range_set(&self) -> Option<&VersionRangeSet> {
        match self.req.inner() {
            RangeSetOrTag::RangeSet(set) => Some(set),
            RangeSetOrTag::Tag(_) => None,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(text: &str) -> VersionRange {
        VersionRange::parse(text).unwrap()
    }

    fn v(text: &str) -> Version {
        parse_version(text).unwrap()
    }

    #[test]
    fn caret_allows_minor_and_patch_bumps() {
        let r = range("^1.2.3");
        assert!(r.satisfies(&v("1.2.3")));
        assert!(r.satisfies(&v("1.9.0")));
        assert!(!r.satisfies(&v("1.2.2")));
        assert!(!r.satisfies(&v("2.0.0")));
    }

    #[test]
    fn caret_on_zero_major_is_narrower() {
        assert!(range("^0.2.3").satisfies(&v("0.2.9")));
        assert!(!range("^0.2.3").satisfies(&v("0.3.0")));
        assert!(range("^0.0.3").satisfies(&v("0.0.3")));
        assert!(!range("^0.0.3").satisfies(&v("0.0.4")));
    }

    #[test]
    fn npm_range_forms() {
        assert!(range("~1.2.3").satisfies(&v("1.2.9")));
        assert!(!range("~1.2.3").satisfies(&v("1.3.0")));
        assert!(range("1.x").satisfies(&v("1.5.0")));
        assert!(!range("1.x").satisfies(&v("2.0.0")));
        assert!(range("*").satisfies(&v("42.0.0")));
        assert!(range(">= 1.2.0 < 2").satisfies(&v("1.99.0")));
        assert!(!range(">= 1.2.0 < 2").satisfies(&v("2.0.0")));
        assert!(range("1.2.3 - 2.3").satisfies(&v("2.3.9")));
        assert!(!range("1.2.3 - 2.3").satisfies(&v("2.4.0")));
    }

    #[test]
    fn unions() {
        let r = range("^16.0.0 || ^17.0.0");
        assert!(r.satisfies(&v("16.14.0")));
        assert!(r.satisfies(&v("17.0.2")));
        assert!(!r.satisfies(&v("18.2.0")));
    }

    #[test]
    fn plain_range_skips_prereleases() {
        assert!(!range("^1.0.0").satisfies(&v("1.1.0-beta.1")));
    }

    #[test]
    fn tags_do_not_parse() {
        assert!(VersionRange::parse("latest").is_err());
        assert!(VersionRange::parse("next").is_err());
    }

    #[test]
    fn oversized_components_are_rejected() {
        let err = VersionRange::parse("^18446744073709551615.0.0").unwrap_err();
        assert!(err.reason.contains("exceeds"));
        assert!(VersionRange::parse(">=1.0.0 <99999999999999999999").is_err());
        assert!(VersionRange::parse("~9007199254740992").is_err());
        assert!(VersionRange::parse("^9007199254740991.0.0").is_ok());
        assert_eq!(parse_version("18446744073709551615.0.0"), None);
    }

    #[test]
    fn intersects_detects_overlap() {
        assert!(range("^1.0.0").intersects(&range(">=1.5.0")));
        assert!(!range("^1.0.0").intersects(&range("^2.0.0")));
        assert!(range("*").intersects(&range("^2.0.0")));
    }

    #[test]
    fn subset_compares_branch_containment() {
        assert!(range("^1.2.0").is_subset_of(&range("^1.0.0")));
        assert!(!range("^1.0.0").is_subset_of(&range("^1.2.0")));
        assert!(!range("^1.0.0").is_subset_of(&range("^2.0.0")));
        assert!(range("~1.4.0").is_subset_of(&range("^1.0.0 || ^2.0.0")));
        assert!(range("1.5.0").is_subset_of(&range("*")));
    }

    #[test]
    fn max_satisfying_picks_highest_match() {
        let versions: Vec<String> = ["1.0.0", "1.4.2", "2.0.0", "1.10.0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(range("^1.0.0").max_satisfying(&versions), Some("1.10.0"));
        assert_eq!(range("^3.0.0").max_satisfying(&versions), None);
    }

    #[test]
    fn parse_version_is_lenient_about_prefixes() {
        assert_eq!(parse_version("v1.2.3"), parse_version("1.2.3"));
        assert_eq!(parse_version("1.2.3+build.5"), parse_version("1.2.3"));
        assert_eq!(v("1.2.3").major, 1);
        assert_eq!(parse_version("not-a-version"), None);
    }
}
