//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigLayer;
use crate::resolver::Strategy;
use crate::ui::OutputMode;

/// Detect, audit, and fix peer dependency issues.
#[derive(Debug, Parser)]
#[command(name = "peer-dep-helper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// Version resolution strategy [default: compatible]
    #[arg(long, global = true, value_parser = strategy_name)]
    pub strategy: Option<String>,

    /// Show what would be installed or changed without changing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Exit with a non-zero code if issues remain
    #[arg(long, global = true)]
    pub fail_on_issues: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and requested JSON
    #[arg(long, global = true)]
    pub silent: bool,

    /// Packages to leave out of the report (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Neither read nor write the result cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Skip all registry lookups
    #[arg(long, global = true)]
    pub offline: bool,

    /// Registry base URL
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// Show package manager output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print all peer dependency issues
    Audit(AuditArgs),

    /// Install the correct versions of missing or mismatched peers
    Fix(FixArgs),
}

/// Arguments for the `audit` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AuditArgs {
    /// Fix actionable issues after reporting them
    #[arg(long)]
    pub fix: bool,
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixArgs {
    /// Record fixed versions in package.json
    #[arg(long)]
    pub write: bool,

    /// Fix only these packages (comma-separated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub only: Vec<String>,
}

impl Cli {
    /// The command-line configuration layer. Switches that were not given
    /// stay unset so lower layers can supply them.
    pub fn config_layer(&self) -> ConfigLayer {
        let (write, only) = match &self.command {
            Commands::Fix(args) => (args.write, args.only.clone()),
            Commands::Audit(_) => (false, Vec::new()),
        };

        ConfigLayer {
            cwd: self.cwd.clone(),
            strategy: self.strategy.clone(),
            dry_run: switch(self.dry_run),
            fail_on_issues: switch(self.fail_on_issues),
            ignore: list(&self.ignore),
            only: list(&only),
            write: switch(write),
            json: switch(self.json),
            silent: switch(self.silent),
            cache: self.no_cache.then_some(false),
            offline: switch(self.offline),
            registry: self.registry.clone(),
        }
    }

    /// Output mode for these flags and the resolved `json`/`silent` settings.
    ///
    /// JSON output drops status chatter so stdout holds only the document.
    pub fn output_mode(&self, json: bool, silent: bool) -> OutputMode {
        match OutputMode::from_flags(self.verbose, silent) {
            mode if json && mode.shows_status() => OutputMode::Quiet,
            mode => mode,
        }
    }
}

fn switch(set: bool) -> Option<bool> {
    set.then_some(true)
}

fn list(values: &[String]) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

fn strategy_name(value: &str) -> Result<String, String> {
    value.parse::<Strategy>().map(|s| s.as_str().to_string())
}
