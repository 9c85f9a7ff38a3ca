//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`peer-dep-helper audit`, `peer-dep-helper fix`)
//! - Shared registry and installer backends
//! - Consistent global flag handling

pub mod audit;
pub mod dispatcher;
pub mod fix;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use crate::audit::AuditOptions;
use crate::config::Settings;
use crate::error::Result;
use crate::issue::{Issue, IssueStatus};
use crate::ui::{render_human, render_json, UserInterface};

/// Detection options derived from resolved settings.
pub(crate) fn audit_options(settings: &Settings) -> AuditOptions {
    AuditOptions {
        strategy: settings.strategy,
        ignore: settings.ignore.clone(),
        use_cache: settings.cache,
    }
}

/// Print the report in the configured format.
///
/// JSON is printed whenever requested; the human report respects the
/// output mode.
pub(crate) fn print_report(
    ui: &mut dyn UserInterface,
    settings: &Settings,
    issues: &[Issue],
    only: &[String],
) -> Result<()> {
    if settings.json {
        let json = render_json(issues, only)?;
        ui.output(&json);
    } else if ui.output_mode().shows_report() {
        let text = render_human(issues, only, &ui.theme())?;
        ui.output(&text);
    }
    Ok(())
}

/// Whether any issue is not `valid`.
pub(crate) fn has_unresolved(issues: &[Issue]) -> bool {
    issues.iter().any(|issue| issue.status != IssueStatus::Valid)
}

/// Exit result for a finished run.
pub(crate) fn finish(settings: &Settings, issues: &[Issue]) -> CommandResult {
    if settings.fail_on_issues && has_unresolved(issues) {
        tracing::debug!("Failing: unresolved issues with --fail-on-issues");
        CommandResult::failure(1)
    } else {
        CommandResult::success()
    }
}
