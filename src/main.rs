use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser as ClapParser;
use log::{debug, trace};

use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::reporter::{ConsoleReporter, ErrorReporter};
use rox::resolver::Resolver;
use rox::scanner::Scanner;
use rox::token::Token;

// https://man.freebsd.org/cgi/man.cgi?query=sysexits
const EX_OK: i32 = 0;
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "A tree-walking interpreter for the Lox language", long_about = None)]
struct Cli {
    /// Script to run; omit it to get a REPL
    scripts: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Cli = Cli::parse();

    if args.scripts.len() > 1 {
        print!("Usage: rox [script]\n");

        std::process::exit(EX_USAGE);
    }

    match args.scripts.first() {
        Some(path) => run_file(path)?,

        None => run_prompt()?,
    }

    Ok(())
}

/// Run one script through the full pipeline and map the outcome to a
/// sysexits code.  Any front-end diagnostic suppresses the later phases.
fn run<W: Write>(source: &[u8], interpreter: &mut Interpreter<W>) -> i32 {
    let mut reporter = ConsoleReporter::new();

    let start: Instant = Instant::now();

    let mut tokens: Vec<Token> = Vec::new();

    for item in Scanner::new(source) {
        match item {
            Ok(token) => tokens.push(token),

            Err(LoxError::Lex { line, message }) => reporter.lexing_error(line, &message),

            Err(e) => reporter.report(e.line().unwrap_or(0), "", &e.to_string()),
        }
    }

    debug!("Lexing took {:?}", start.elapsed());

    for token in &tokens {
        trace!("{}", token);
    }

    let start: Instant = Instant::now();

    let statements = Parser::new(tokens, &mut reporter).parse();

    debug!("Parsing took {:?}", start.elapsed());

    if reporter.had_error() {
        return EX_DATAERR;
    }

    let start: Instant = Instant::now();

    Resolver::new(interpreter, &mut reporter).resolve(&statements);

    debug!("Resolving took {:?}", start.elapsed());

    if reporter.had_error() {
        return EX_DATAERR;
    }

    let start: Instant = Instant::now();

    let result = interpreter.interpret(&statements, &mut reporter);

    debug!("Interpreting took {:?}", start.elapsed());

    if result.is_err() {
        return EX_SOFTWARE;
    }

    EX_OK
}

fn run_file(path: &PathBuf) -> anyhow::Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    let mut reader: BufReader<File> = BufReader::new(File::open(path)?);

    reader.read_to_end(&mut buf)?;

    let mut interpreter: Interpreter<io::Stdout> = Interpreter::new(io::stdout());

    let code: i32 = run(&buf, &mut interpreter);

    if code != EX_OK {
        std::process::exit(code);
    }

    Ok(())
}

/// A serial loop of independent scripts sharing one globals environment.
/// Diagnostics are printed and swallowed; the loop keeps going.
fn run_prompt() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut interpreter: Interpreter<io::Stdout> = Interpreter::new(io::stdout());

    println!("Lox REPL");

    let mut line: String = String::new();

    loop {
        stdout.write_all(b"> ")?;
        stdout.flush()?;

        line.clear();

        let nbytes: usize = stdin.read_line(&mut line)?;

        if nbytes == 0 || line.trim_end_matches(['\r', '\n']).is_empty() {
            // Ctrl-D or an empty line ends the session.
            println!();
            break;
        }

        run(line.as_bytes(), &mut interpreter);
    }

    Ok(())
}
