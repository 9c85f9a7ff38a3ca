//! Audit report rendering.
//!
//! Both renderers refuse issue lists that stray outside an active
//! allow-list.

use serde::Serialize;

use super::{ReportTheme, Table};
use crate::error::Result;
use crate::issue::{ensure_allowed, Issue, IssueStatus};

/// Overall verdict of a JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Every issue is valid.
    Success,
    /// At least one issue is not valid.
    Fail,
}

/// Per-status issue counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueSummary {
    pub missing: usize,
    pub mismatched: usize,
    pub outdated: usize,
    pub valid: usize,
    pub total: usize,
}

impl IssueSummary {
    /// Count issues by status.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Default::default()
        };
        for issue in issues {
            match issue.status {
                IssueStatus::Missing => summary.missing += 1,
                IssueStatus::VersionMismatch => summary.mismatched += 1,
                IssueStatus::Outdated => summary.outdated += 1,
                IssueStatus::Valid => summary.valid += 1,
            }
        }
        summary
    }

    /// Issues that are not valid.
    pub fn unresolved(&self) -> usize {
        self.missing + self.mismatched + self.outdated
    }

    /// The verdict for this summary.
    pub fn status(&self) -> ReportStatus {
        if self.unresolved() > 0 {
            ReportStatus::Fail
        } else {
            ReportStatus::Success
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: ReportStatus,
    issues: &'a [Issue],
}

/// Render the machine-readable report.
pub fn render_json(issues: &[Issue], only: &[String]) -> Result<String> {
    ensure_allowed(issues, only, "render report")?;

    let report = JsonReport {
        status: IssueSummary::from_issues(issues).status(),
        issues,
    };
    Ok(serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?)
}

/// Render the human-readable report.
pub fn render_human(issues: &[Issue], only: &[String], theme: &ReportTheme) -> Result<String> {
    ensure_allowed(issues, only, "render report")?;

    if issues.is_empty() {
        return Ok(theme.format_success("No peer dependency issues found."));
    }

    let summary = IssueSummary::from_issues(issues);
    let mut lines = vec![
        format!("{}", theme.header.apply_to("Peer Dependency Audit Report:")),
        String::new(),
        format!("{}", theme.header.apply_to("Summary:")),
    ];

    let mut table = Table::new(vec!["Category", "Count"]);
    table.add_row(vec![
        theme.error.apply_to("Missing").to_string(),
        summary.missing.to_string(),
    ]);
    table.add_row(vec![
        theme.warning.apply_to("Mismatched").to_string(),
        summary.mismatched.to_string(),
    ]);
    table.add_row(vec![
        theme.info.apply_to("Outdated").to_string(),
        summary.outdated.to_string(),
    ]);
    table.add_row(vec![
        theme.success.apply_to("Valid").to_string(),
        summary.valid.to_string(),
    ]);
    table.add_row(vec![
        theme.highlight.apply_to("Total Checked").to_string(),
        summary.total.to_string(),
    ]);
    lines.push(table.render());
    lines.push(String::new());

    let sections = [
        (IssueStatus::Missing, "❌ Missing Peer Dependencies:", &theme.error),
        (
            IssueStatus::VersionMismatch,
            "⚠️ Version Mismatch Peer Dependencies:",
            &theme.warning,
        ),
        (IssueStatus::Outdated, "⬆️ Outdated Peer Dependencies:", &theme.info),
        (IssueStatus::Valid, "✅ Valid Peer Dependencies:", &theme.success),
    ];

    for (status, title, style) in sections {
        let matching: Vec<&Issue> = issues.iter().filter(|i| i.status == status).collect();
        if matching.is_empty() {
            continue;
        }

        lines.push(format!("{}", style.apply_to(title).bold()));
        for issue in matching {
            lines.push(describe(issue, theme));
            if !issue.demanded_by.is_empty() {
                lines.push(format!("{}", theme.dim.apply_to("    Demanded by:")));
                for demand in &issue.demanded_by {
                    let optional = if demand.optional { ", optional" } else { "" };
                    lines.push(format!(
                        "{}",
                        theme.dim.apply_to(format!(
                            "      - {} (range: {}{})",
                            demand.name, demand.version_range, optional
                        ))
                    ));
                }
            }
        }
        lines.push(String::new());
    }

    if summary.unresolved() > 0 {
        lines.push(format!("{}", theme.error.apply_to("Action Required:")));
        lines.push("  Run `peer-dep-helper fix` to attempt to resolve these issues.".to_string());
    } else {
        lines.push(format!(
            "{}",
            theme.success.apply_to("All peer dependencies are correctly installed.")
        ));
    }

    Ok(lines.join("\n"))
}

fn describe(issue: &Issue, theme: &ReportTheme) -> String {
    let package = theme.package.apply_to(&issue.package);
    let required = issue.required_version.as_deref().unwrap_or("*");
    let installed = issue.installed_version.as_deref().unwrap_or("none");

    match issue.status {
        IssueStatus::Missing => format!(
            "  - {} (required by {}) requires {} but is {}.",
            package,
            issue.required_by,
            theme.warning.apply_to(required),
            theme.error.apply_to("missing")
        ),
        IssueStatus::VersionMismatch => format!(
            "  - {} (required by {}) requires {}, but {} is installed.",
            package,
            issue.required_by,
            theme.warning.apply_to(required),
            theme.warning.apply_to(installed)
        ),
        IssueStatus::Outdated => format!(
            "  - {} (required by {}) has {} installed, but {} is available.",
            package,
            issue.required_by,
            theme.success.apply_to(installed),
            theme
                .info
                .apply_to(issue.latest_version.as_deref().unwrap_or(required))
        ),
        IssueStatus::Valid => format!(
            "  - {} (required by {}) requires {} and {} is installed.",
            package,
            issue.required_by,
            theme.success.apply_to(required),
            theme.success.apply_to(installed)
        ),
    }
}
