//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for writing to the terminal
//! - [`MockUI`] for capturing output in tests
//! - Report rendering for audit results
//!
//! # Example
//!
//! ```
//! use peer_dep_helper::ui::{MockUI, OutputMode, UserInterface};
//!
//! let mut ui = MockUI::with_mode(OutputMode::Quiet);
//! ui.message("Scanning workspace");
//! ui.success("All peer dependencies resolved!");
//! assert!(ui.has_success("resolved"));
//! ```

pub mod mock;
pub mod output;
pub mod report;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use report::{render_human, render_json, IssueSummary, ReportStatus};
pub use table::Table;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, ReportTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show verbose detail, such as package manager output.
    fn detail(&mut self, text: &str);

    /// Write machine-readable output verbatim, regardless of mode.
    fn output(&mut self, text: &str);

    /// Theme used to style rendered reports.
    fn theme(&self) -> ReportTheme {
        ReportTheme::plain()
    }
}
