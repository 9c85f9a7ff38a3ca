//! Version range resolution.
//!
//! Collapses every range demanded for one dependency into a single
//! representative range according to a [`Strategy`].
//!
//! The `strict` strategy narrows by subset comparison only. It is not a
//! true interval intersection: when two ranges overlap without one
//! containing the other, or are disjoint, the earlier candidate is kept.
//! Callers must not assume the result is satisfiable by every demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::range::VersionRange;

/// How competing ranges for one dependency are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Narrow to the most restrictive range by subset comparison.
    Strict,
    /// Keep the first range when it overlaps every other, else narrow.
    #[default]
    Compatible,
    /// Use the first range as written.
    Latest,
}

impl Strategy {
    /// All strategies, in CLI order.
    pub const ALL: [Strategy; 3] = [Strategy::Strict, Strategy::Compatible, Strategy::Latest];

    /// The strategy's lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Compatible => "compatible",
            Self::Latest => "latest",
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "compatible" => Ok(Self::Compatible),
            "latest" => Ok(Self::Latest),
            _ => Err(format!(
                "unknown strategy '{}' (expected strict, compatible or latest)",
                s
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve `ranges` to one representative range.
///
/// Returns `None` only for empty input.
pub fn resolve_range(ranges: &[String], strategy: Strategy) -> Option<String> {
    let first = ranges.first()?;

    match strategy {
        Strategy::Latest => {
            tracing::warn!(
                "The 'latest' strategy uses the first declared range ({}) without a registry lookup",
                first
            );
            Some(first.clone())
        }
        Strategy::Strict => Some(narrow(ranges)),
        Strategy::Compatible => {
            if overlaps_all(first, &ranges[1..]) {
                Some(first.clone())
            } else {
                Some(narrow(ranges))
            }
        }
    }
}

/// Walk the ranges left to right, replacing the candidate whenever a later
/// range is a subset of it.
fn narrow(ranges: &[String]) -> String {
    let mut candidate = ranges[0].clone();

    for next in &ranges[1..] {
        let (Ok(current), Ok(parsed)) = (VersionRange::parse(&candidate), VersionRange::parse(next))
        else {
            tracing::debug!("Cannot compare '{}' with '{}'; keeping candidate", candidate, next);
            continue;
        };

        if parsed.is_subset_of(&current) {
            candidate = next.clone();
        }
    }

    candidate
}

fn overlaps_all(first: &str, rest: &[String]) -> bool {
    let Ok(first) = VersionRange::parse(first) else {
        return rest.is_empty();
    };

    rest.iter().all(|other| {
        VersionRange::parse(other)
            .map(|other| first.intersects(&other))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_resolves_to_none() {
        for strategy in Strategy::ALL {
            assert_eq!(resolve_range(&[], strategy), None);
        }
    }

    #[test]
    fn single_range_is_returned_as_is() {
        for strategy in Strategy::ALL {
            assert_eq!(
                resolve_range(&ranges(&["^18.0.0"]), strategy),
                Some("^18.0.0".to_string())
            );
        }
    }

    #[test]
    fn latest_returns_first_range() {
        let input = ranges(&["^17.0.0", "^18.0.0"]);
        assert_eq!(resolve_range(&input, Strategy::Latest), Some("^17.0.0".into()));
    }

    #[test]
    fn strict_narrows_to_subset() {
        let input = ranges(&["^1.0.0", "^1.2.0", ">=1.0.0"]);
        assert_eq!(resolve_range(&input, Strategy::Strict), Some("^1.2.0".into()));
    }

    #[test]
    fn strict_keeps_candidate_for_disjoint_ranges() {
        let input = ranges(&["^1.0.0", "^2.0.0"]);
        assert_eq!(resolve_range(&input, Strategy::Strict), Some("^1.0.0".into()));
    }

    #[test]
    fn strict_keeps_candidate_for_overlapping_incomparable_ranges() {
        let input = ranges(&[">=1.0.0 <1.5.0", ">=1.2.0 <2.0.0"]);
        assert_eq!(
            resolve_range(&input, Strategy::Strict),
            Some(">=1.0.0 <1.5.0".into())
        );
    }

    #[test]
    fn strict_skips_unparseable_ranges() {
        let input = ranges(&["^1.0.0", "latest", "~1.4.0"]);
        assert_eq!(resolve_range(&input, Strategy::Strict), Some("~1.4.0".into()));
    }

    #[test]
    fn compatible_keeps_first_when_all_overlap() {
        let input = ranges(&[">=1.0.0", "^1.2.0", "~1.4.0"]);
        assert_eq!(resolve_range(&input, Strategy::Compatible), Some(">=1.0.0".into()));
    }

    #[test]
    fn compatible_falls_back_to_strict() {
        let input = ranges(&["^1.0.0", "^2.0.0", "~1.3.0"]);
        assert_eq!(resolve_range(&input, Strategy::Compatible), Some("~1.3.0".into()));
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("strict".parse::<Strategy>(), Ok(Strategy::Strict));
        assert_eq!("Compatible".parse::<Strategy>(), Ok(Strategy::Compatible));
        assert_eq!("latest".parse::<Strategy>(), Ok(Strategy::Latest));
        assert!("newest".parse::<Strategy>().is_err());
    }

    #[test]
    fn strategy_default_and_display() {
        assert_eq!(Strategy::default(), Strategy::Compatible);
        assert_eq!(Strategy::Strict.to_string(), "strict");
    }
}
