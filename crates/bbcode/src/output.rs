//! Status messages on stderr.
//!
//! Rendered documents go to stdout, so everything meant for the user's eyes
//! is written here instead.

use std::fmt::Display;

use console::{Term, style};

/// Stderr status writer.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn line(&self, line: impl Display) {
        // Status output is best effort
        let _ = self.term.write_line(&line.to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(style(msg).green());
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(style(msg).yellow());
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(style(msg).red());
    }

    /// `label: value`, label in cyan bold.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        self.line(format_args!("{} {value}", style(format!("{label}:")).cyan().bold()));
    }
}
