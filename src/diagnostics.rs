//! Error sink used by the CLI binary: formats each
//! [ParserError](crate::error::ParserError) as `"<file>:<line>:<col>: <message>"` and,
//! when `JS_PARSER_ERROR_LOG` is set, appends one such line per error to that path.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::ParserError;

pub const ERROR_LOG_ENV: &str = "JS_PARSER_ERROR_LOG";

/// Collects formatted error lines for one parse and mirrors them to the configured log
/// file. A fresh `Diagnostics` is created per parse call; it owns no global state.
pub struct Diagnostics {
    file_label: String,
    log_path: Option<PathBuf>,
    messages: Vec<String>,
}

impl Diagnostics {
    pub fn new(file_label: impl Into<String>) -> Self {
        Self {
            file_label: file_label.into(),
            log_path: std::env::var_os(ERROR_LOG_ENV).map(PathBuf::from),
            messages: Vec::new(),
        }
    }

    fn label(&self) -> &str {
        if self.file_label.is_empty() {
            "<unknown>"
        } else {
            &self.file_label
        }
    }

    /// Format `error`, append it to the log file if one is configured, and record it.
    pub fn report(&mut self, error: &ParserError) {
        let line = format!("{}:{}: {}", self.label(), error.position, error.message);
        self.append_to_log(&line);
        self.messages.push(line);
    }

    fn append_to_log(&self, line: &str) {
        let Some(path) = &self.log_path else { return };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{line}");
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn unlabeled_file_falls_back_to_unknown() {
        std::env::remove_var(ERROR_LOG_ENV);
        let mut sink = Diagnostics::new("");
        sink.report(&ParserError::syntax(Position::new(1, 1), "unexpected token"));
        assert_eq!(sink.messages()[0], "<unknown>:1:1: unexpected token");
    }

    #[test]
    fn labeled_file_is_used_verbatim() {
        std::env::remove_var(ERROR_LOG_ENV);
        let mut sink = Diagnostics::new("input.js");
        sink.report(&ParserError::syntax(Position::new(2, 5), "missing ;"));
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.messages()[0], "input.js:2:5: missing ;");
    }
}
