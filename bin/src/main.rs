use std::{
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

use errors::Diagnostics;
use interpreter::Interpreter;

// Exit codes from sysexits.h
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;

/// Evaluates a Lox expression from a script, or line by line from a prompt.
#[derive(clap::Parser)]
struct Args {
    /// Script to evaluate. Starts a prompt if omitted.
    script: Option<PathBuf>,

    /// Print the scanned tokens.
    #[arg(long)]
    print_tokens: bool,

    /// Print the parsed expression in prefix form before evaluating it.
    #[arg(long)]
    print_ast: bool,
}

fn run(source: &str, args: &Args, diagnostics: &mut Diagnostics) {
    let tokens = scanner::scan(source, diagnostics);
    if args.print_tokens {
        for token in &tokens {
            println!("{:?} {:?} (line {})", token.kind(), token.lexeme, token.line);
        }
    }

    let Ok(expr) = parser::parse(tokens, diagnostics) else { return };
    if diagnostics.had_error() {
        return;
    }

    if args.print_ast {
        println!("{expr}");
    }

    if let Some(value) = Interpreter::new().interpret(&expr, diagnostics) {
        println!("{value}");
    }
}

fn report(diagnostics: &Diagnostics) {
    for error in diagnostics.errors().iter() {
        eprintln!("{error}");
    }
    for error in diagnostics.runtime_errors() {
        eprintln!("{error}");
    }
}

fn run_file(path: &Path, args: &Args) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let mut diagnostics = Diagnostics::new();
    run(&source, args, &mut diagnostics);
    report(&diagnostics);

    Ok(if diagnostics.had_error() {
        ExitCode::from(EX_DATAERR)
    } else if diagnostics.had_runtime_error() {
        ExitCode::from(EX_SOFTWARE)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_prompt(args: &Args) -> anyhow::Result<ExitCode> {
    let mut diagnostics = Diagnostics::new();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout().flush()?;

        line.clear();
        if stdin().read_line(&mut line)? == 0 {
            // EOF
            println!();
            return Ok(ExitCode::SUCCESS);
        }
        if line.trim().is_empty() {
            continue;
        }

        run(&line, args, &mut diagnostics);
        report(&diagnostics);
        // A typo shouldn't end the session
        diagnostics.reset();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            e.print()?;
            return Ok(ExitCode::from(EX_USAGE));
        }
        // --help and --version
        Err(e) => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    log::debug!("Script: {:?}", args.script);

    match &args.script {
        Some(path) => run_file(path, &args),
        None => run_prompt(&args),
    }
}
