//! The `fix` command.

use crate::audit::Auditor;
use crate::cli::args::FixArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::fix::{FixOptions, FixOrchestrator, FixOutcome};
use crate::installer::Installer;
use crate::issue::restrict_to;
use crate::registry::Registry;
use crate::ui::UserInterface;

use super::{audit_options, finish, print_report, Command, CommandResult};

/// Installs missing or mismatched peers, then re-audits.
pub struct FixCommand<'a> {
    settings: &'a Settings,
    args: FixArgs,
    registry: &'a dyn Registry,
    installer: &'a dyn Installer,
}

impl<'a> FixCommand<'a> {
    /// Create the command.
    pub fn new(
        settings: &'a Settings,
        args: FixArgs,
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

    /// The allow-list. Flags were already folded into the settings;
    /// `args` is only consulted for a command built without them.
    fn only(&self) -> &[String] {
        if self.settings.only.is_empty() {
            &self.args.only
        } else {
            &self.settings.only
        }
    }
}

impl Command for FixCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let only = self.only().to_vec();
        let auditor = Auditor::new(&self.settings.cwd, self.registry, audit_options(self.settings));
        let issues = restrict_to(auditor.run()?, &only);
        tracing::debug!(
            "Fixable issues: {:?}",
            issues
                .iter()
                .filter(|i| i.is_fixable())
                .map(|i| i.package.as_str())
                .collect::<Vec<_>>()
        );

        if !self.settings.dry_run && issues.iter().any(|i| i.is_fixable()) {
            ui.message("Applying fixes...");
        }

        let options = FixOptions {
            dry_run: self.settings.dry_run,
            write: self.settings.write || self.args.write,
            only: only.clone(),
        };
        let outcome = FixOrchestrator::new(&auditor, self.installer, options).run(issues, ui)?;

        match outcome {
            FixOutcome::NothingToFix | FixOutcome::DryRun(_) => Ok(CommandResult::success()),
            FixOutcome::Converged { .. } | FixOutcome::IterationCapReached { .. } => {
                ui.message("Fixes applied. Re-auditing...");
                let updated = restrict_to(auditor.run()?, &only);
                print_report(ui, self.settings, &updated, &only)?;
                Ok(finish(self.settings, &updated))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::InstallOutput;
    use crate::package_manager::PackageManager;
    use crate::registry::OfflineRegistry;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeInstaller {
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Installer for FakeInstaller {
        fn install(&self, _: PackageManager, packages: &[String], cwd: &Path) -> Result<InstallOutput> {
            self.calls.borrow_mut().push(packages.to_vec());
            for name in packages {
                let dir = cwd.join("node_modules").join(name);
                fs::create_dir_all(&dir).unwrap();
                fs::write(
                    dir.join("package.json"),
                    format!(r#"{{"name":"{}","version":"1.0.0"}}"#, name),
                )
                .unwrap();
            }
            Ok(InstallOutput::default())
        }
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"app","peerDependencies":{"left-pad":"^1.0.0","right-pad":"^1.0.0"}}"#,
        )
        .unwrap();
        temp
    }

    fn settings(root: &Path) -> Settings {
        Settings {
            cwd: root.to_path_buf(),
            offline: true,
            ..Default::default()
        }
    }

    #[test]
    fn only_restricts_installs_and_report() {
        let temp = project();
        let settings = Settings {
            only: vec!["right-pad".to_string()],
            ..settings(temp.path())
        };
        let installer = FakeInstaller::default();
        let mut ui = MockUI::new();

        let result = FixCommand::new(&settings, FixArgs::default(), &OfflineRegistry, &installer)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result, CommandResult::success());
        assert_eq!(*installer.calls.borrow(), vec![vec!["right-pad".to_string()]]);
        assert!(ui.has_message("Applying fixes..."));
        let report = &ui.outputs()[0];
        assert!(report.contains("right-pad"));
        assert!(!report.contains("left-pad"));
    }

    #[test]
    fn dry_run_prints_plan_only() {
        let temp = project();
        let settings = Settings {
            dry_run: true,
            ..settings(temp.path())
        };
        let installer = FakeInstaller::default();
        let mut ui = MockUI::new();

        FixCommand::new(&settings, FixArgs::default(), &OfflineRegistry, &installer)
            .execute(&mut ui)
            .unwrap();

        assert!(installer.calls.borrow().is_empty());
        assert!(ui.has_message("[Dry Run] Would install: left-pad@* (required range: ^1.0.0)"));
        assert!(!ui.has_message("Applying fixes..."));
        assert!(ui.outputs().is_empty());
    }

    #[test]
    fn nothing_to_fix_prints_no_report() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name":"app"}"#).unwrap();
        let settings = settings(temp.path());
        let mut ui = MockUI::new();

        let result = FixCommand::new(
            &settings,
            FixArgs::default(),
            &OfflineRegistry,
            &FakeInstaller::default(),
        )
        .execute(&mut ui)
        .unwrap();

        assert_eq!(result, CommandResult::success());
        assert!(ui.has_message("No fixable peer dependency issues found."));
        assert!(ui.outputs().is_empty());
    }

    #[test]
    fn write_flag_updates_manifest() {
        let temp = project();
        let settings = settings(temp.path());
        let args = FixArgs {
            write: true,
            only: Vec::new(),
        };
        let mut ui = MockUI::new();

        FixCommand::new(&settings, args, &OfflineRegistry, &FakeInstaller::default())
            .execute(&mut ui)
            .unwrap();

        let manifest = fs::read_to_string(temp.path().join("package.json")).unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(manifest["dependencies"]["left-pad"], "*");
        assert_eq!(manifest["dependencies"]["right-pad"], "*");
    }
}
