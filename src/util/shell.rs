//! Terminal status output.
//!
//! Status lines are `{status:>12} {message}` with the status word coloured by
//! kind, the layout the CLI uses for everything user-facing. Long-running
//! steps get a [`Span`] which shows a spinner and reports elapsed time.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: no spinners, start lines printed immediately
    Verbose,
}

/// Status word printed in front of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Exported,

    // In-progress statuses (cyan)
    Fetching,
    Installing,
    Bootstrapping,
    Configuring,
    Compiling,
    Packaging,

    // Info statuses (blue)
    Info,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Exported => "Exported",
            Status::Fetching => "Fetching",
            Status::Installing => "Installing",
            Status::Bootstrapping => "Bootstrapping",
            Status::Configuring => "Configuring",
            Status::Compiling => "Compiling",
            Status::Packaging => "Packaging",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Exported => "\x1b[1;32m",
            Status::Fetching
            | Status::Installing
            | Status::Bootstrapping
            | Status::Configuring
            | Status::Compiling
            | Status::Packaging => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Width of the right-aligned status column.
const STATUS_WIDTH: usize = 13;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: bool) -> Self {
        Shell {
            verbosity,
            use_color: color && io::stderr().is_terminal(),
        }
    }

    /// Create a shell from CLI flags; quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, no_color: bool) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, !no_color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message. In quiet mode only errors are printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Start a timed span for a long-running step.
    pub fn span(&self, status: Status, msg: impl Display) -> Span<'_> {
        Span::new(self, status, msg.to_string())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, true)
    }
}

/// A timed step. The spinner disappears and a `Finished` line with the
/// elapsed time is printed when the span is finished or dropped.
pub struct Span<'a> {
    shell: &'a Shell,
    spinner: Option<ProgressBar>,
    start: Instant,
    finished: bool,
}

impl<'a> Span<'a> {
    fn new(shell: &'a Shell, status: Status, message: String) -> Self {
        let interactive = !shell.is_quiet() && !shell.is_verbose() && io::stderr().is_terminal();

        let spinner = if interactive {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {prefix} {msg}") {
                pb.set_style(style);
            }
            pb.set_prefix(shell.format_status(status));
            pb.set_message(message);
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            shell.status(status, &message);
            None
        };

        Span {
            shell,
            spinner,
            start: Instant::now(),
            finished: false,
        }
    }

    /// Finish the span with a message.
    pub fn finish_with_message(mut self, msg: impl Display) {
        self.finished = true;
        self.clear();
        self.shell.status(
            Status::Finished,
            format!("{} in {}", msg, format_duration(self.start.elapsed())),
        );
    }

    fn clear(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        self.clear();
        if !self.finished {
            tracing::debug!("step ended after {}", format_duration(self.start.elapsed()));
        }
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = d.as_secs() / 60;
        format!("{}m {:02}s", mins, d.as_secs() % 60)
    }
}
