//! Terminal output utilities

use console::style;
use updatectl_update::Reporter;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Routes pipeline messages to the terminal. Quiet mode keeps errors only.
#[derive(Debug, Clone, Copy)]
pub struct TerminalReporter {
    quiet: bool,
}

impl TerminalReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for TerminalReporter {
    fn info(&self, message: &str) {
        if !self.quiet {
            info(message);
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            success(message);
        }
    }

    fn warning(&self, message: &str) {
        if !self.quiet {
            warning(message);
        }
    }

    fn error(&self, message: &str) {
        error(message);
    }
}
