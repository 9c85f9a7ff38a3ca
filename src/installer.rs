//! Package installation.
//!
//! The fix loop installs through the [`Installer`] trait so that tests can
//! substitute an in-process fake for the package manager subprocess.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::error::{PeerDepError, Result};
use crate::package_manager::PackageManager;

/// Captured output of a successful install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Installs packages into a project.
pub trait Installer {
    /// Install `packages` (each `name` or `name@version`) in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `InstallFailed` if the package manager reports failure.
    fn install(
        &self,
        manager: PackageManager,
        packages: &[String],
        cwd: &Path,
    ) -> Result<InstallOutput>;
}

/// Runs the real package manager as a subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInstaller;

impl Installer for CommandInstaller {
    fn install(
        &self,
        manager: PackageManager,
        packages: &[String],
        cwd: &Path,
    ) -> Result<InstallOutput> {
        run_command(manager.program(), &manager.install_args(packages), cwd)
    }
}

/// Run `program` with `args` in `cwd`, capturing its output.
fn run_command(program: &str, args: &[String], cwd: &Path) -> Result<InstallOutput> {
    let command_line = std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!("Running `{}` in {:?}", command_line, cwd);

    let start = Instant::now();
    let output = platform_command(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| PeerDepError::CommandSpawn {
            command: command_line.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    tracing::debug!(
        "`{}` exited with {:?} after {:?}",
        command_line,
        output.status.code(),
        start.elapsed()
    );

    if !output.status.success() {
        return Err(PeerDepError::InstallFailed {
            command: command_line,
            code: output.status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(InstallOutput { stdout, stderr })
}

/// Package managers ship as `.cmd` shims on Windows, which need a shell.
#[cfg(windows)]
fn platform_command(program: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(program);
    cmd
}

#[cfg(not(windows))]
fn platform_command(program: &str) -> Command {
    Command::new(program)
}
