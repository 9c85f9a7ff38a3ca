//! The `audit` command.

use crate::audit::Auditor;
use crate::cli::args::AuditArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::fix::{FixOptions, FixOrchestrator, FixOutcome};
use crate::installer::Installer;
use crate::registry::Registry;
use crate::ui::UserInterface;

use super::{audit_options, finish, has_unresolved, print_report, Command, CommandResult};

/// Reports peer dependency issues, optionally fixing them.
pub struct AuditCommand<'a> {
    settings: &'a Settings,
    args: AuditArgs,
    registry: &'a dyn Registry,
    installer: &'a dyn Installer,
}

impl<'a> AuditCommand<'a> {
    /// Create the command.
    pub fn new(
        settings: &'a Settings,
        args: AuditArgs,
        registry: &'a dyn Registry,
        installer: &'a dyn Installer,
    ) -> Self {
        Self {
            settings,
            args,
            registry,
            installer,
        }
    }
}

impl Command for AuditCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let auditor = Auditor::new(&self.settings.cwd, self.registry, audit_options(self.settings));
        let issues = auditor.run()?;
        print_report(ui, self.settings, &issues, &[])?;

        if issues.is_empty() && !self.settings.ignore.is_empty() {
            ui.message("No issues found after applying ignore list.");
        }

        if !(self.args.fix && has_unresolved(&issues)) {
            return Ok(finish(self.settings, &issues));
        }

        ui.message("Attempting to fix issues...");
        let options = FixOptions {
            dry_run: self.settings.dry_run,
            write: self.settings.write,
            only: Vec::new(),
        };
        let outcome = FixOrchestrator::new(&auditor, self.installer, options).run(issues.clone(), ui)?;
        if let FixOutcome::DryRun(_) = outcome {
            return Ok(finish(self.settings, &issues));
        }

        ui.message("Fix attempt complete. Re-auditing...");
        let updated = auditor.run()?;
        print_report(ui, self.settings, &updated, &[])?;

        Ok(finish(self.settings, &updated))
    }
}
