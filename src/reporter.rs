//! Diagnostic sink shared by every front-end phase.
//!
//! The scanner, parser and resolver never print; they hand their diagnostics
//! to an [`ErrorReporter`] and keep going.  The driver inspects the sticky
//! `had_error` flag between phases to decide whether execution may proceed.

use log::debug;

use crate::token::{Token, TokenType};

pub trait ErrorReporter {
    /// Lexical error at `line`.
    fn lexing_error(&mut self, line: usize, message: &str);

    /// Syntax or static-resolution error anchored to `token`.
    fn parse_error(&mut self, token: &Token, message: &str);

    /// Runtime error anchored to the responsible token's line.
    fn runtime_error(&mut self, line: usize, message: &str);

    /// Lowest-level entry: emit one diagnostic line.
    fn report(&mut self, line: usize, location: &str, message: &str);

    /// True once any diagnostic has been emitted.
    fn had_error(&self) -> bool;
}

/// Reporter printing single-line diagnostics to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    had_error: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorReporter for ConsoleReporter {
    fn lexing_error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    fn parse_error(&mut self, token: &Token, message: &str) {
        if token.token_type == TokenType::EOF {
            self.report(token.line, " at end", message);
        } else {
            let location: String = format!(" at '{}'", token.lexeme);

            self.report(token.line, &location, message);
        }
    }

    fn runtime_error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    fn report(&mut self, line: usize, location: &str, message: &str) {
        debug!(
            "Reporting diagnostic: line={}, location={}, message={}",
            line, location, message
        );

        eprintln!("[line {}] Error{}: {}", line, location, message);

        self.had_error = true;
    }

    fn had_error(&self) -> bool {
        self.had_error
    }
}
