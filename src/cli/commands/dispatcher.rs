//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::Commands;
use crate::config::Settings;
use crate::error::Result;
use crate::installer::{CommandInstaller, Installer};
use crate::registry::{NpmRegistry, OfflineRegistry, Registry};
use crate::ui::UserInterface;

use super::audit::AuditCommand;
use super::fix::FixCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
    registry: Box<dyn Registry>,
    installer: Box<dyn Installer>,
}

impl CommandDispatcher {
    /// Create a dispatcher using the real registry and package manager.
    ///
    /// With `offline` set, registry lookups are skipped entirely.
    pub fn new(settings: Settings) -> Result<Self> {
        let registry: Box<dyn Registry> = if settings.offline {
            Box::new(OfflineRegistry)
        } else {
            Box::new(NpmRegistry::new(&settings.registry)?)
        };
        Ok(Self::with_backends(
            settings,
            registry,
            Box::new(CommandInstaller),
        ))
    }

    /// Create a dispatcher with explicit registry and installer backends.
    pub fn with_backends(
        settings: Settings,
        registry: Box<dyn Registry>,
        installer: Box<dyn Installer>,
    ) -> Self {
        Self {
            settings,
            registry,
            installer,
        }
    }

    /// Get the resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, command: &Commands, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        tracing::debug!("Dispatching {:?} in {}", command, self.settings.cwd.display());

        match command {
            Commands::Audit(args) => AuditCommand::new(
                &self.settings,
                args.clone(),
                self.registry.as_ref(),
                self.installer.as_ref(),
            )
            .execute(ui),
            Commands::Fix(args) => FixCommand::new(
                &self.settings,
                args.clone(),
                self.registry.as_ref(),
                self.installer.as_ref(),
            )
            .execute(ui),
        }
    }
}
