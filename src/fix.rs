//! The fix-and-reverify loop.
//!
//! Fixable issues (`missing` and `version_mismatch`) become an install plan.
//! After each install the cache is cleared and detection runs again; the
//! loop stops when nothing fixable remains or after
//! [`MAX_FIX_ITERATIONS`] installs.

use std::collections::BTreeMap;

use crate::audit::Auditor;
use crate::cache::CacheStore;
use crate::error::Result;
use crate::installer::Installer;
use crate::issue::{ensure_allowed, restrict_to, Issue};
use crate::manifest::write_dependencies;
use crate::package_manager::PackageManager;
use crate::registry::resolve_install_version;
use crate::ui::UserInterface;

/// Upper bound on install passes in one fix run.
pub const MAX_FIX_ITERATIONS: usize = 5;

/// Options for one fix run.
#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    /// Only report the plan; install nothing and touch no files.
    pub dry_run: bool,
    /// Record resolved versions in the root manifest's `dependencies`.
    pub write: bool,
    /// Restrict fixing to these packages. Empty means no restriction.
    pub only: Vec<String>,
}

/// One package the plan would install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstall {
    pub package: String,
    /// The representative range the issue reported.
    pub required_range: Option<String>,
    /// The concrete version chosen, when one could be determined.
    pub version: Option<String>,
}

impl PlannedInstall {
    /// Argument passed to the package manager.
    pub fn install_spec(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.package, version),
            None => self.package.clone(),
        }
    }

    /// Value written to `dependencies` on write-back.
    pub fn manifest_version(&self) -> &str {
        self.version.as_deref().unwrap_or("*")
    }
}

/// The installs for one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub manager: PackageManager,
    pub installs: Vec<PlannedInstall>,
}

impl InstallPlan {
    /// Package arguments in plan order.
    pub fn install_specs(&self) -> Vec<String> {
        self.installs.iter().map(PlannedInstall::install_spec).collect()
    }

    /// Full command line, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.manager.program().to_string())
            .chain(self.manager.install_args(&self.install_specs()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn manifest_updates(&self) -> BTreeMap<String, String> {
        self.installs
            .iter()
            .map(|i| (i.package.clone(), i.manifest_version().to_string()))
            .collect()
    }
}

/// How a fix run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// No fixable issues were given.
    NothingToFix,
    /// Dry run: the plan that would have been executed.
    DryRun(InstallPlan),
    /// Re-detection found nothing fixable after `iterations` installs.
    Converged { iterations: usize },
    /// The install budget ran out with issues still fixable.
    IterationCapReached {
        iterations: usize,
        remaining: Vec<Issue>,
    },
}

/// Drives installs until detection reports nothing fixable.
pub struct FixOrchestrator<'a> {
    auditor: &'a Auditor<'a>,
    installer: &'a dyn Installer,
    options: FixOptions,
}

impl<'a> FixOrchestrator<'a> {
    /// Create an orchestrator that re-detects with `auditor` and installs
    /// with `installer`.
    pub fn new(auditor: &'a Auditor<'a>, installer: &'a dyn Installer, options: FixOptions) -> Self {
        Self {
            auditor,
            installer,
            options,
        }
    }

    /// Fix `issues`.
    ///
    /// # Errors
    ///
    /// Returns `AllowListViolation` before doing anything if an allow-list
    /// is active and `issues` contains a package outside it. Install,
    /// write-back, cache and re-detection failures stop the loop and
    /// propagate.
    pub fn run(&self, issues: Vec<Issue>, ui: &mut dyn UserInterface) -> Result<FixOutcome> {
        ensure_allowed(&issues, &self.options.only, "apply fixes")?;

        let mut pending: Vec<Issue> = issues.into_iter().filter(Issue::is_fixable).collect();
        if pending.is_empty() {
            ui.message(if self.options.dry_run {
                "[Dry Run] No fixable peer dependency issues found."
            } else {
                "No fixable peer dependency issues found."
            });
            return Ok(FixOutcome::NothingToFix);
        }

        let manager = PackageManager::detect(self.auditor.root());
        tracing::debug!("Using package manager {}", manager);

        if self.options.dry_run {
            let plan = self.plan(&pending, manager);
            ui.message("[Dry Run] No changes will be made.");
            ui.message("[Dry Run] Packages that would be installed/updated:");
            for install in &plan.installs {
                ui.message(&format!(
                    "[Dry Run] Would install: {}@{} (required range: {})",
                    install.package,
                    install.manifest_version(),
                    install.required_range.as_deref().unwrap_or("*")
                ));
            }
            return Ok(FixOutcome::DryRun(plan));
        }

        let mut iteration = 0;
        loop {
            iteration += 1;
            let plan = self.plan(&pending, manager);
            self.apply(&plan, ui)?;

            let remaining: Vec<Issue> = restrict_to(self.auditor.run_fresh()?, &self.options.only)
                .into_iter()
                .filter(Issue::is_fixable)
                .collect();

            if remaining.is_empty() {
                ui.success("All peer dependencies resolved!");
                return Ok(FixOutcome::Converged {
                    iterations: iteration,
                });
            }

            if iteration >= MAX_FIX_ITERATIONS {
                tracing::warn!(
                    "Stopped after {} fix iterations with {} issue(s) left",
                    iteration,
                    remaining.len()
                );
                ui.warning(
                    "Maximum fix iterations reached. Some peer dependencies may still be missing.",
                );
                return Ok(FixOutcome::IterationCapReached {
                    iterations: iteration,
                    remaining,
                });
            }

            ui.message(&format!(
                "Detected {} new missing or mismatched peer dependencies. Running fix again (iteration {}/{})...",
                remaining.len(),
                iteration + 1,
                MAX_FIX_ITERATIONS
            ));
            pending = remaining;
        }
    }

    /// Resolve an installable version for every fixable issue.
    pub fn plan(&self, issues: &[Issue], manager: PackageManager) -> InstallPlan {
        let mut installs: Vec<PlannedInstall> = Vec::new();
        for issue in issues.iter().filter(|i| i.is_fixable()) {
            if installs.iter().any(|i| i.package == issue.package) {
                continue;
            }
            let version = resolve_install_version(
                self.auditor.registry(),
                &issue.package,
                issue.required_version.as_deref(),
            );
            installs.push(PlannedInstall {
                package: issue.package.clone(),
                required_range: issue.required_version.clone(),
                version,
            });
        }
        InstallPlan { manager, installs }
    }

    fn apply(&self, plan: &InstallPlan, ui: &mut dyn UserInterface) -> Result<()> {
        let root = self.auditor.root();
        ui.message(&format!("Executing: {}", plan.command_line()));

        let output = self
            .installer
            .install(plan.manager, &plan.install_specs(), root)?;
        if !output.stdout.is_empty() {
            ui.detail(&output.stdout);
        }
        if !output.stderr.is_empty() {
            ui.detail(&output.stderr);
        }
        ui.message("Installation complete.");

        if self.options.write {
            ui.message("Updating package.json...");
            if write_dependencies(root, &plan.manifest_updates())? {
                ui.message("package.json updated.");
            } else {
                ui.warning("Could not find root package.json to update.");
            }
        }

        if CacheStore::new(root).clear()? {
            ui.message("Cache cleared.");
        }
        Ok(())
    }
}
