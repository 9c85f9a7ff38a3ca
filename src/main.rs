//! peer-dep-helper CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use peer_dep_helper::cli::{Cli, CommandDispatcher};
use peer_dep_helper::config::load_settings;
use peer_dep_helper::ui::{OutputMode, TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so JSON on stdout stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("peer_dep_helper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("peer_dep_helper=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("peer-dep-helper starting with args: {:?}", cli);

    let settings = match load_settings(cli.config_layer()) {
        Ok(settings) => settings,
        Err(e) => {
            let mut ui = TerminalUI::new(OutputMode::from_flags(cli.verbose, cli.silent));
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let mut ui = TerminalUI::new(cli.output_mode(settings.json, settings.silent));

    let result = CommandDispatcher::new(settings).and_then(|d| d.dispatch(&cli.command, &mut ui));
    match result {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
