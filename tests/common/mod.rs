#![allow(dead_code)]

use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::reporter::{ConsoleReporter, ErrorReporter};
use rox::resolver::Resolver;
use rox::scanner::Scanner;
use rox::token::Token;

/// Phase-level outcome of one pipeline run, mirroring the driver's exit
/// codes: front-end diagnostics suppress execution, runtime errors halt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Ok,
    DataError,
    RuntimeError,
}

/// Run `source` through the whole pipeline, capturing program output.
pub fn run_source(source: &str) -> (String, RunOutcome) {
    let mut reporter = ConsoleReporter::new();

    let mut tokens: Vec<Token> = Vec::new();

    for item in Scanner::new(source.as_bytes()) {
        match item {
            Ok(token) => tokens.push(token),

            Err(LoxError::Lex { line, message }) => reporter.lexing_error(line, &message),

            Err(e) => reporter.report(e.line().unwrap_or(0), "", &e.to_string()),
        }
    }

    let statements = Parser::new(tokens, &mut reporter).parse();

    if reporter.had_error() {
        return (String::new(), RunOutcome::DataError);
    }

    let mut interpreter: Interpreter<Vec<u8>> = Interpreter::new(Vec::new());

    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);

    if reporter.had_error() {
        return (String::new(), RunOutcome::DataError);
    }

    let result = interpreter.interpret(&statements, &mut reporter);

    let output: String =
        String::from_utf8(interpreter.into_output()).expect("program output is UTF-8");

    match result {
        Ok(()) => (output, RunOutcome::Ok),

        Err(_) => (output, RunOutcome::RuntimeError),
    }
}

/// Run `source` expecting clean execution; hand back stdout.
pub fn run_ok(source: &str) -> String {
    let (output, outcome) = run_source(source);

    assert_eq!(outcome, RunOutcome::Ok, "program failed: {}", source);

    output
}
