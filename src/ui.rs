//! Terminal UI: spinner and human-readable status lines.
//!
//! # Design goals
//!
//! - **Separate from logging.** `tracing` carries the diagnostic trail (`Running: …`, config paths);
//!   the [`Reporter`] prints the short ✓/✗ verdicts an operator actually reads.
//! - **Testable without a terminal.** [`Reporter`] writes to any [`Write`], so tests render into a
//!   `Vec<u8>` and assert on plain text.
//!
//! # Typical usage
//!
//! ```no_run
//! let mut reporter = Reporter::stderr();
//! reporter.stage("Consistency check", true)?;
//! reporter.summary(false, "Not enough snapshots taken!")?;
//! ```

use std::{
    io::{self, Stderr, Write},
    time::Duration,
};

use console::{StyledObject, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::snapshots::{GroupReport, Policy};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames, same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Create and start an indeterminate spinner for `label`.
///
/// Draws to stderr and stays invisible when stderr is not a terminal.  Call
/// [`ProgressBar::finish_and_clear`] before printing anything else.
pub fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("  {spinner:.cyan}  {msg}") {
        pb.set_style(template.tick_chars(SPINNER_CHARS));
    }
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Reporter ─────────────────────────────────────────────────────────────────

/// Renders operation results for humans.
///
/// Constructed once in `main` and handed to each operation by `&mut`.
pub struct Reporter<W: Write> {
    out: W,
    colored: bool,
}

impl Reporter<Stderr> {
    /// Reporter on the process's stderr, coloured when stderr is a terminal.
    pub fn stderr() -> Self {
        Self {
            out: io::stderr(),
            colored: console::colors_enabled_stderr(),
        }
    }
}

impl<W: Write> Reporter<W> {
    /// Plain-text reporter over `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            colored: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn ok_icon(&self) -> StyledObject<&'static str> {
        style("✓").green().bold().force_styling(self.colored)
    }

    fn err_icon(&self) -> StyledObject<&'static str> {
        style("✗").red().bold().force_styling(self.colored)
    }

    /// One line per pipeline stage: `✓  <label>` or `✗  <label>`.
    pub fn stage(&mut self, label: &str, success: bool) -> io::Result<()> {
        let icon = if success { self.ok_icon() } else { self.err_icon() };
        let label = style(label).bold().force_styling(self.colored);
        writeln!(self.out, "  {icon}  {label}")
    }

    /// One line per snapshot group with its recent-snapshot count.
    pub fn group(&mut self, report: &GroupReport, policy: &Policy) -> io::Result<()> {
        let paths = style(report.paths.join(" ")).bold().force_styling(self.colored);
        let days = policy.window.num_days();
        if report.passed {
            writeln!(
                self.out,
                "  {}  {paths}  {} snapshots in the last {days} days",
                self.ok_icon(),
                report.recent,
            )
        } else {
            let verdict = style(format!(
                "insufficient: {} snapshots in the last {days} days, need {}",
                report.recent, policy.min_snapshots
            ))
            .red()
            .force_styling(self.colored);
            writeln!(self.out, "  {}  {paths}  {verdict}", self.err_icon())
        }
    }

    /// Closing banner.
    pub fn summary(&mut self, success: bool, message: &str) -> io::Result<()> {
        writeln!(self.out)?;
        if success {
            let message = style(message).cyan().bold().force_styling(self.colored);
            writeln!(self.out, "  {}  {message}", self.ok_icon())
        } else {
            let message = style(message).red().bold().force_styling(self.colored);
            writeln!(self.out, "  {}  {message}", self.err_icon())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
