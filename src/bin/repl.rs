use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::error;

use monkey_rs::error::ParserErrors;
use monkey_rs::eval::{self, Environment};
use monkey_rs::lexer::Lexer;
use monkey_rs::parser::Parser;

const BANNER: &str = "monkey-rs v0.1.0\n";
const PROMPT: &str = ">> ";

#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Source file to evaluate once. Without this, starts an interactive prompt.
    file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Trace
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).expect("logger already initialized");

    match args.file {
        Some(path) => run_file(&path),
        None => run_repl(),
    }
}

fn run_file(path: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            error!("could not read {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let env = Environment::new();
    match evaluate_line(&source, &env) {
        Ok(object) => {
            println!("{}", object.inspect());
            ExitCode::SUCCESS
        }
        Err(errors) => {
            print!("{errors}");
            ExitCode::SUCCESS
        }
    }
}

fn run_repl() -> ExitCode {
    print!("{BANNER}");

    let env = Environment::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("{PROMPT}");
    let _ = stdout.flush();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        match evaluate_line(&line, &env) {
            Ok(object) => println!("{}", object.inspect()),
            Err(errors) => print!("{errors}"),
        }

        print!("{PROMPT}");
        let _ = stdout.flush();
    }

    ExitCode::SUCCESS
}

fn evaluate_line(
    source: &str,
    env: &std::rc::Rc<std::cell::RefCell<Environment>>,
) -> Result<monkey_rs::eval::Object, ParserErrors> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        return Err(ParserErrors(parser.errors().to_vec()));
    }

    Ok(eval::eval(&program, env))
}
