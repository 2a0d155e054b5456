//! Styled marks and messages for terminal output.
//!
//! `console` drops the colour codes when the stream is not a terminal.

use console::{StyledObject, style};

#[must_use]
pub fn success_mark() -> StyledObject<&'static str> {
    style("✓").green().bold()
}

#[must_use]
pub fn failure_mark() -> StyledObject<&'static str> {
    style("✗").red().bold()
}

#[must_use]
pub fn warning_mark() -> StyledObject<&'static str> {
    style("!").yellow().bold()
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", failure_mark().for_stderr(), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", warning_mark().for_stderr(), message);
}
